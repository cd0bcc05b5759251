/// Steps one dimension's slice text through its indices on a timer. The
/// text typed before the animation started comes back when it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub dim: usize,
    pub frame: usize,
    saved_text: String,
}

impl Animation {
    pub fn begin(dim: usize, texts: &mut [String]) -> Animation {
        let saved_text = std::mem::replace(&mut texts[dim], "0".to_string());
        Animation {
            dim,
            frame: 0,
            saved_text,
        }
    }

    pub fn advance(&mut self, size: usize, texts: &mut [String]) {
        if size == 0 {
            return;
        }
        self.frame = (self.frame + 1) % size;
        texts[self.dim] = self.frame.to_string();
    }

    pub fn stop(self, texts: &mut [String]) {
        texts[self.dim] = self.saved_text;
    }
}
