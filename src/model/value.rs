use std::path::PathBuf;

use ndarray::ArrayD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    pub fn promote(self, other: DType) -> DType {
        if self == other { self } else { DType::F64 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRef {
    pub source: PathBuf,
    pub dataset: String,
    pub shape: Vec<usize>,
    pub dtype: DType,
}

#[derive(Debug, Clone)]
pub enum Value {
    Scalar(f64),
    Text(String),
    TextList(Vec<String>),
    Array { data: ArrayD<f64>, dtype: DType },
    Ref(ArrayRef),
}

impl Value {
    pub fn array(data: ArrayD<f64>, dtype: DType) -> Self {
        Value::Array { data, dtype }
    }

    pub fn shape(&self) -> Option<&[usize]> {
        match self {
            Value::Array { data, .. } => Some(data.shape()),
            Value::Ref(reference) => Some(&reference.shape),
            _ => None,
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().map_or(0, <[usize]>::len)
    }

    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Array { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn dtype(&self) -> Option<DType> {
        match self {
            Value::Array { dtype, .. } => Some(*dtype),
            Value::Ref(reference) => Some(reference.dtype),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Value::Scalar(value) => format!("scalar {value}"),
            Value::Text(_) => "text".to_string(),
            Value::TextList(items) => format!("text[{}]", items.len()),
            Value::Array { data, dtype } => format!("{} {:?}", dtype.name(), data.shape()),
            Value::Ref(reference) => format!(
                "{} {:?} (not loaded, {})",
                reference.dtype.name(),
                reference.shape,
                reference.source.display()
            ),
        }
    }
}
