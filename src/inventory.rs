//! Plugin inventory sources.
//!
//! The inventory itself comes from a native plugin hosting library which
//! exposes a small C API:
//!
//! ```c
//! void*       PluginScanner_new(void);
//! int         PluginScanner_getNumPlugins(void* scanner);
//! const char* PluginScanner_getName(void* scanner, int index);
//! const char* PluginScanner_getManufacturer(void* scanner, int index);
//! const char* PluginScanner_getFileOrIdentifier(void* scanner, int index);
//! ```
//!
//! The library is loaded at runtime so the rest of the crate builds and
//! tests without it.

use crate::error::AuditError;
use crate::plugin::{Inventory, PluginRecord};
use crate::quiet::silenced;
use anyhow::{Context, Result};
use libloading::Library;
use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::path::Path;

/// Anything that can list installed plugins by index.
pub trait PluginSource {
    fn count(&self) -> Result<usize>;
    fn name(&self, index: usize) -> Result<String>;
    fn manufacturer(&self, index: usize) -> Result<String>;
    fn identifier(&self, index: usize) -> Result<String>;
}

/// Reads every plugin from a source, in index order.
pub fn collect<S: PluginSource + ?Sized>(source: &S) -> Result<Inventory> {
    let count = source.count()?;
    let mut inventory = Vec::with_capacity(count);

    for index in 0..count {
        inventory.push(PluginRecord {
            name: source.name(index)?,
            manufacturer: source.manufacturer(index)?,
            identifier: source.identifier(index)?,
        });
    }

    Ok(inventory)
}

type NewFn = unsafe extern "C" fn() -> *mut c_void;
type CountFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type StringFn = unsafe extern "C" fn(*mut c_void, c_int) -> *const c_char;

/// Inventory source backed by the native hosting library.
pub struct NativeScanner {
    scanner: *mut c_void,
    count_fn: CountFn,
    name_fn: StringFn,
    manufacturer_fn: StringFn,
    identifier_fn: StringFn,
    // Must outlive the function pointers above.
    _library: Library,
}

impl NativeScanner {
    /// Loads the hosting library and runs its plugin scan.
    pub fn load(library_path: &Path) -> Result<Self> {
        // SAFETY: loading runs the library's initialisers; the library is
        // trusted operator configuration.
        let library = silenced(|| unsafe { Library::new(library_path) })
            .map_err(|e| AuditError::Scanner(e.to_string()))
            .context(format!("Failed to load plugin scanner library: {:?}", library_path))?;

        // SAFETY: the symbol types match the library's C API.
        let (new_fn, count_fn, name_fn, manufacturer_fn, identifier_fn) = unsafe {
            (
                symbol::<NewFn>(&library, b"PluginScanner_new\0")?,
                symbol::<CountFn>(&library, b"PluginScanner_getNumPlugins\0")?,
                symbol::<StringFn>(&library, b"PluginScanner_getName\0")?,
                symbol::<StringFn>(&library, b"PluginScanner_getManufacturer\0")?,
                symbol::<StringFn>(&library, b"PluginScanner_getFileOrIdentifier\0")?,
            )
        };

        // SAFETY: no arguments; the returned handle is checked below.
        let scanner = silenced(|| unsafe { new_fn() });
        if scanner.is_null() {
            return Err(AuditError::Scanner("PluginScanner_new returned null".to_string()).into());
        }

        Ok(Self {
            scanner,
            count_fn,
            name_fn,
            manufacturer_fn,
            identifier_fn,
            _library: library,
        })
    }

    fn string_at(&self, func: StringFn, what: &str, index: usize) -> Result<String> {
        let c_index = c_int::try_from(index)
            .map_err(|_| AuditError::Scanner(format!("plugin index {} out of range", index)))?;

        // SAFETY: `scanner` came from PluginScanner_new and the library is
        // still loaded.
        let ptr = silenced(|| unsafe { func(self.scanner, c_index) });
        if ptr.is_null() {
            return Err(AuditError::Scanner(format!("null {} for plugin {}", what, index)).into());
        }

        // SAFETY: non-null, NUL-terminated, valid until the next call.
        let value = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        Ok(value)
    }
}

/// Resolves a symbol and copies out the function pointer.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> Result<T> {
    let sym = library.get::<T>(name).map_err(|e| AuditError::Scanner(e.to_string()))?;
    Ok(*sym)
}

impl PluginSource for NativeScanner {
    fn count(&self) -> Result<usize> {
        // SAFETY: see string_at.
        let count = silenced(|| unsafe { (self.count_fn)(self.scanner) });
        usize::try_from(count)
            .map_err(|_| AuditError::Scanner(format!("negative plugin count {}", count)).into())
    }

    fn name(&self, index: usize) -> Result<String> {
        self.string_at(self.name_fn, "name", index)
    }

    fn manufacturer(&self, index: usize) -> Result<String> {
        self.string_at(self.manufacturer_fn, "manufacturer", index)
    }

    fn identifier(&self, index: usize) -> Result<String> {
        self.string_at(self.identifier_fn, "identifier", index)
    }
}
