use crate::core::BasketStore;
use crate::utils::error::Result;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Basket slot stored as `<base_path>/<key>.json`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
    key: String,
}

impl LocalStorage {
    pub fn new(base_path: String, key: String) -> Self {
        Self { base_path, key }
    }

    pub fn slot_path(&self) -> PathBuf {
        Path::new(&self.base_path).join(format!("{}.json", self.key))
    }
}

impl BasketStore for LocalStorage {
    fn load(&self) -> Result<Option<Vec<String>>> {
        let full_path = self.slot_path();
        if !full_path.exists() {
            return Ok(None);
        }

        let data = fs::read(full_path)?;
        let items = serde_json::from_slice(&data)?;
        Ok(Some(items))
    }

    fn save(&self, items: &[String]) -> Result<()> {
        let full_path = self.slot_path();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Whole-value replace: readers see the old or the new sequence, never a mix.
        let tmp_path = full_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec(items)?)?;
        fs::rename(tmp_path, full_path)?;
        Ok(())
    }
}

/// In-process slot; clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl BasketStore for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<String>>> {
        match self.slot.borrow().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, items: &[String]) -> Result<()> {
        *self.slot.borrow_mut() = Some(serde_json::to_string(items)?);
        Ok(())
    }
}
