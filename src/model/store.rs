use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD, Axis, stack};

use super::{CoreError, DType, Result, Value};

pub type Group = BTreeMap<String, Entry>;

#[derive(Debug, Clone)]
pub enum Entry {
    Group(Group),
    Leaf(Value),
}

impl Entry {
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Entry::Group(children) => Some(children),
            Entry::Leaf(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Group(_) => None,
            Entry::Leaf(value) => Some(value),
        }
    }
}

/// Tree of loaded files. Top-level entries keep insertion order, group
/// children list in float-aware key order.
#[derive(Debug, Default)]
pub struct DataStore {
    files: Vec<String>,
    root: Group,
    diff_count: usize,
}

impl DataStore {
    pub fn new() -> DataStore {
        DataStore::default()
    }

    pub fn insert_file(&mut self, key: String, root: Group) {
        if !self.files.contains(&key) {
            self.files.push(key.clone());
        }
        self.root.insert(key, Entry::Group(root));
    }

    pub fn file_keys(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &[String]) -> Option<&Entry> {
        node(&self.root, path)
    }

    pub fn value(&self, path: &[String]) -> Option<&Value> {
        self.get(path).and_then(Entry::as_value)
    }

    pub fn replace_value(&mut self, path: &[String], value: Value) -> Result<()> {
        match node_mut(&mut self.root, path) {
            Some(Entry::Leaf(slot)) => {
                *slot = value;
                Ok(())
            }
            Some(Entry::Group(_)) => Err(CoreError::NotAnArray { path: path.join("/") }),
            None => Err(CoreError::NotFound { path: path.join("/") }),
        }
    }

    pub fn remove(&mut self, path: &[String]) -> Result<Entry> {
        let (parent, name) = self.parent_mut(path)?;
        let removed = parent
            .remove(name.as_str())
            .ok_or(CoreError::NotFound { path: path.join("/") })?;
        if path.len() == 1 {
            self.files.retain(|key| key != &path[0]);
        }
        Ok(removed)
    }

    pub fn rename(&mut self, path: &[String], new_name: &str) -> Result<()> {
        {
            let (parent, _) = self.parent_mut(path)?;
            if parent.contains_key(new_name) {
                return Err(CoreError::NameTaken { name: new_name.to_string() });
            }
        }
        let entry = self.remove(path)?;
        let mut target = path.to_vec();
        if let Some(last) = target.last_mut() {
            *last = new_name.to_string();
        }
        self.set_entry(&target, entry)?;
        if target.len() == 1 {
            self.files.push(target[0].clone());
        }
        Ok(())
    }

    /// Stacks the same-shaped members of a group along a new axis, moves
    /// that axis to the end and drops singleton dimensions. Partial
    /// combinations and top-level groups land in a child named `combined`;
    /// a full combination replaces the group. Returns the result path.
    pub fn combine(&mut self, path: &[String]) -> Result<Vec<String>> {
        let joined = path.join("/");
        let group = self
            .get(path)
            .and_then(Entry::as_group)
            .ok_or(CoreError::NotAGroup { path: joined.clone() })?;
        let keys: Vec<String> = sorted_keys(group).into_iter().cloned().collect();
        let first = keys
            .first()
            .and_then(|key| group.get(key))
            .and_then(Entry::as_value)
            .ok_or(CoreError::NotCombinable { path: joined.clone() })?;

        let (combined, member_keys, member_rank) = match first {
            Value::Scalar(_) => {
                let member_keys: Vec<String> = keys
                    .iter()
                    .filter(|key| matches!(group.get(*key).and_then(Entry::as_value), Some(Value::Scalar(_))))
                    .cloned()
                    .collect();
                let values: Vec<f64> = member_keys
                    .iter()
                    .filter_map(|key| match group.get(key).and_then(Entry::as_value) {
                        Some(Value::Scalar(v)) => Some(*v),
                        _ => None,
                    })
                    .collect();
                let stacked = squeeze(Array1::from(values).into_dyn());
                (as_value(stacked, DType::F64), member_keys, 1)
            }
            Value::Array { data: head, dtype } => {
                let shape = head.shape().to_vec();
                let mut member_keys = Vec::new();
                let mut dtype = *dtype;
                let mut members = Vec::new();
                for key in &keys {
                    if let Some(Value::Array { data, dtype: member_dtype }) =
                        group.get(key).and_then(Entry::as_value)
                    {
                        if data.shape() == shape.as_slice() {
                            member_keys.push(key.clone());
                            dtype = dtype.promote(*member_dtype);
                            members.push(data.view());
                        }
                    }
                }
                let stacked = stack(Axis(0), &members).map_err(|_| CoreError::NotCombinable {
                    path: joined.clone(),
                })?;
                let stacked = squeeze(move_first_to_last(stacked));
                (as_value(stacked, dtype), member_keys, shape.len())
            }
            _ => return Err(CoreError::NotCombinable { path: joined }),
        };

        let partial = member_keys.len() != keys.len();
        let mut target = path.to_vec();
        if partial || path.len() == 1 {
            target.push("combined".to_string());
        }
        if partial && member_rank > 1 {
            for key in &member_keys {
                let mut member_path = path.to_vec();
                member_path.push(key.clone());
                self.remove(&member_path)?;
            }
        }
        self.set_entry(&target, Entry::Leaf(combined))?;
        Ok(target)
    }

    /// Builds a top-level `Diff n` group holding both operands and their
    /// difference.
    pub fn diff(&mut self, left: &[String], right: &[String]) -> Result<String> {
        let left_value = self
            .value(left)
            .ok_or(CoreError::NotFound { path: left.join("/") })?;
        let right_value = self
            .value(right)
            .ok_or(CoreError::NotFound { path: right.join("/") })?;
        let (Value::Array { data: a, dtype: da }, Value::Array { data: b, dtype: db }) =
            (left_value, right_value)
        else {
            return Err(CoreError::NotAnArray { path: left.join("/") });
        };
        if a.shape() != b.shape() {
            return Err(CoreError::ShapeMismatch {
                left: a.shape().to_vec(),
                right: b.shape().to_vec(),
            });
        }
        let delta = Value::array(a - b, da.promote(*db));
        let left_value = left_value.clone();
        let right_value = right_value.clone();

        let name = format!("Diff {}", self.diff_count);
        self.diff_count += 1;
        let mut group = Group::new();
        group.insert(format!("[0] {}", left.join("/")), Entry::Leaf(left_value));
        group.insert(format!("[1] {}", right.join("/")), Entry::Leaf(right_value));
        group.insert("~> Diff [0]-[1]".to_string(), Entry::Leaf(delta));
        self.insert_file(name.clone(), group);
        Ok(name)
    }

    pub fn leaves(&self) -> Vec<(Vec<String>, &Value)> {
        let mut out = Vec::new();
        for key in &self.files {
            if let Some(entry) = self.root.get(key) {
                collect_leaves(&mut out, vec![key.clone()], entry);
            }
        }
        out
    }

    pub fn first_leaf_path(&self) -> Option<Vec<String>> {
        self.leaves().into_iter().map(|(path, _)| path).next()
    }

    fn set_entry(&mut self, path: &[String], entry: Entry) -> Result<()> {
        if path.len() == 1 {
            self.root.insert(path[0].clone(), entry);
            return Ok(());
        }
        let (parent, name) = self.parent_mut(path)?;
        parent.insert(name, entry);
        Ok(())
    }

    fn parent_mut(&mut self, path: &[String]) -> Result<(&mut Group, String)> {
        let (last, front) = path
            .split_last()
            .ok_or(CoreError::NotFound { path: String::new() })?;
        if front.is_empty() {
            return Ok((&mut self.root, last.clone()));
        }
        match node_mut(&mut self.root, front) {
            Some(Entry::Group(children)) => Ok((children, last.clone())),
            Some(Entry::Leaf(_)) => Err(CoreError::NotAGroup { path: front.join("/") }),
            None => Err(CoreError::NotFound { path: front.join("/") }),
        }
    }
}

fn node<'a>(group: &'a Group, path: &[String]) -> Option<&'a Entry> {
    let (first, rest) = path.split_first()?;
    let entry = group.get(first)?;
    if rest.is_empty() {
        Some(entry)
    } else {
        node(entry.as_group()?, rest)
    }
}

fn node_mut<'a>(group: &'a mut Group, path: &[String]) -> Option<&'a mut Entry> {
    let (first, rest) = path.split_first()?;
    let entry = group.get_mut(first)?;
    if rest.is_empty() {
        Some(entry)
    } else {
        match entry {
            Entry::Group(children) => node_mut(children, rest),
            Entry::Leaf(_) => None,
        }
    }
}

fn collect_leaves<'a>(out: &mut Vec<(Vec<String>, &'a Value)>, path: Vec<String>, entry: &'a Entry) {
    match entry {
        Entry::Leaf(value) => out.push((path, value)),
        Entry::Group(children) => {
            for key in sorted_keys(children) {
                let mut next = path.clone();
                next.push(key.clone());
                if let Some(child) = children.get(key) {
                    collect_leaves(out, next, child);
                }
            }
        }
    }
}

/// Keys that parse as numbers order numerically, the rest lexically.
pub fn sorted_keys(group: &Group) -> Vec<&String> {
    let mut keys: Vec<&String> = group.keys().collect();
    keys.sort_by_key(|key| float_key(key));
    keys
}

fn float_key(key: &str) -> String {
    match key.trim().parse::<f64>() {
        Ok(value) => format!("{value:10.2}"),
        Err(_) => key.to_string(),
    }
}

fn as_value(data: ArrayD<f64>, dtype: DType) -> Value {
    if data.ndim() == 0 {
        Value::Scalar(data.iter().next().copied().unwrap_or(f64::NAN))
    } else {
        Value::array(data, dtype)
    }
}

fn move_first_to_last(data: ArrayD<f64>) -> ArrayD<f64> {
    let ndim = data.ndim();
    if ndim < 2 {
        return data;
    }
    let mut order: Vec<usize> = (1..ndim).collect();
    order.push(0);
    data.permuted_axes(order)
}

fn squeeze(mut data: ArrayD<f64>) -> ArrayD<f64> {
    for axis in (0..data.ndim()).rev() {
        if data.shape()[axis] == 1 {
            data = data.index_axis_move(Axis(axis), 0);
        }
    }
    data
}
