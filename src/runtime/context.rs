use std::path::Path;

use ndarray::ArrayD;

use crate::formats::{LoadedFile, read_file};
use crate::model::{CoreError, DType, DataStore, Entry, Value, permute, reshape};
use crate::view::{ViewSession, ViewStateStore};
use crate::workflow::{ViewReport, ViewSpec, run_view};

use super::{Preferences, Result};

/// Owns what a display host needs: the loaded data tree, the remembered
/// per-dataset view states and the preferences.
#[derive(Debug, Default)]
pub struct AppContext {
    store: DataStore,
    views: ViewStateStore,
    prefs: Preferences,
}

impl AppContext {
    pub fn new(prefs: Preferences) -> AppContext {
        AppContext {
            store: DataStore::new(),
            views: ViewStateStore::default(),
            prefs,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Preferences {
        &mut self.prefs
    }

    /// Loads a file synchronously and files it under its tree key.
    pub fn open(&mut self, path: &Path) -> Result<String> {
        let file = read_file(path, self.prefs.max_file_bytes(), self.prefs.first_to_last)?;
        Ok(self.absorb(file))
    }

    /// Files a finished background load into the store.
    pub fn absorb(&mut self, file: LoadedFile) -> String {
        let LoadedFile { key, root } = file;
        self.store.insert_file(key.clone(), root);
        key
    }

    pub fn close(&mut self, path: &[String]) -> Result<()> {
        self.store.remove(path)?;
        self.views.forget(&ViewStateStore::key(path));
        Ok(())
    }

    /// Opens a view session on a stored dataset, restoring any remembered
    /// state for it.
    pub fn session(&self, path: &[String]) -> Result<(ViewSession, &Value)> {
        let value = self
            .store
            .value(path)
            .ok_or_else(|| CoreError::NotFound { path: path.join("/") })?;
        let key = ViewStateStore::key(path);
        let shape = value.shape().map(<[usize]>::to_vec).unwrap_or_default();
        let state = self.views.restore(&key, &shape);
        Ok((ViewSession::new(key, value, state), value))
    }

    /// Remembers a session's state so reopening the dataset restores it.
    pub fn save_session(&mut self, session: &ViewSession) {
        self.views.save(&session.key, session.state.clone());
    }

    /// Reorders a stored array's dimensions; remembered view state moves
    /// with them.
    pub fn permute(&mut self, path: &[String], order: &[usize]) -> Result<()> {
        let (data, dtype) = self.array_at(path)?;
        let permuted = permute(data, order)?;
        self.store.replace_value(path, Value::array(permuted, dtype))?;
        self.views.permute(&ViewStateStore::key(path), order);
        Ok(())
    }

    /// Reshapes a stored array; remembered view state no longer applies
    /// and is dropped.
    pub fn reshape(&mut self, path: &[String], shape: &[usize]) -> Result<()> {
        let (data, dtype) = self.array_at(path)?;
        let reshaped = reshape(data, shape)?;
        self.store.replace_value(path, Value::array(reshaped, dtype))?;
        self.views.forget(&ViewStateStore::key(path));
        Ok(())
    }

    pub fn rename(&mut self, path: &[String], new_name: &str) -> Result<()> {
        self.store.rename(path, new_name)?;
        self.views.forget(&ViewStateStore::key(path));
        Ok(())
    }

    pub fn combine(&mut self, path: &[String]) -> Result<Vec<String>> {
        Ok(self.store.combine(path)?)
    }

    pub fn diff(&mut self, left: &[String], right: &[String]) -> Result<String> {
        Ok(self.store.diff(left, right)?)
    }

    pub fn run_workflow(&self, spec: &ViewSpec) -> Result<ViewReport> {
        Ok(run_view(
            spec,
            &self.prefs.plan_settings(),
            self.prefs.max_file_bytes(),
            self.prefs.first_to_last,
        )?)
    }

    fn array_at(&self, path: &[String]) -> Result<(&ArrayD<f64>, DType)> {
        match self.store.get(path) {
            Some(Entry::Leaf(Value::Array { data, dtype })) => Ok((data, *dtype)),
            Some(_) => Err(CoreError::NotAnArray { path: path.join("/") }.into()),
            None => Err(CoreError::NotFound { path: path.join("/") }.into()),
        }
    }
}
