//! Dynamically loaded compute library.
//!
//! The library exports three C symbols:
//!
//! ```c
//! void initialize_system(void);
//! void set_aeration(int value);
//! int  compute_with_cosmos(int value);
//! ```
//!
//! It keeps global state between those calls, so every compute runs the full
//! initialise / configure / compute sequence under one lock.

use crate::domain::ports::NativeCompute;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Platform-specific file name of the library.
pub fn library_file_name<'a>(windows_name: &'a str, unix_name: &'a str) -> &'a str {
    if cfg!(windows) {
        windows_name
    } else {
        unix_name
    }
}

pub struct NativeLibrary {
    path: PathBuf,
    symbols: Option<dl::Symbols>,
    call_lock: Mutex<()>,
}

impl NativeLibrary {
    /// Never fails; a missing or broken library yields an unavailable wrapper.
    pub fn load(dir: impl AsRef<Path>, windows_name: &str, unix_name: &str) -> Self {
        let file_name = library_file_name(windows_name, unix_name);
        let joined = dir.as_ref().join(file_name);
        let path = std::path::absolute(&joined).unwrap_or(joined);

        if !path.exists() {
            tracing::warn!("C library not found at: {}", path.display());
            return Self::unavailable(path);
        }

        match dl::open(&path) {
            Ok(symbols) => {
                tracing::info!("C library loaded: {}", path.display());
                Self {
                    path,
                    symbols: Some(symbols),
                    call_lock: Mutex::new(()),
                }
            }
            Err(e) => {
                tracing::error!("Failed to load C library {}: {}", path.display(), e);
                Self::unavailable(path)
            }
        }
    }

    pub fn unavailable(path: PathBuf) -> Self {
        Self {
            path,
            symbols: None,
            call_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeCompute for NativeLibrary {
    fn is_available(&self) -> bool {
        self.symbols.is_some()
    }

    fn compute(&self, cosmos_value: i32, aeration: i32) -> Option<i32> {
        let Some(symbols) = &self.symbols else {
            tracing::warn!("C library unavailable; skipping compute.");
            return None;
        };

        let _guard = self
            .call_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = symbols.compute(cosmos_value, aeration);
        tracing::info!("C compute result: {}", result);
        Some(result)
    }
}

mod dl {
    use std::ffi::c_void;
    use std::path::Path;

    type InitializeSystem = unsafe extern "C" fn();
    type SetAeration = unsafe extern "C" fn(libc::c_int);
    type ComputeWithCosmos = unsafe extern "C" fn(libc::c_int) -> libc::c_int;

    pub struct Symbols {
        initialize_system: InitializeSystem,
        set_aeration: SetAeration,
        compute_with_cosmos: ComputeWithCosmos,
        // Keeps the library mapped while the function pointers are alive.
        _handle: sys::Handle,
    }

    impl Symbols {
        pub fn compute(&self, cosmos_value: i32, aeration: i32) -> i32 {
            // SAFETY: the pointers were resolved from the still-open handle and
            // match the exported C signatures.
            unsafe {
                (self.initialize_system)();
                (self.set_aeration)(aeration);
                (self.compute_with_cosmos)(cosmos_value)
            }
        }
    }

    pub fn open(path: &Path) -> Result<Symbols, String> {
        let handle = sys::Handle::open(path)?;

        // SAFETY: each symbol is transmuted to the signature documented in the
        // module header.
        unsafe {
            Ok(Symbols {
                initialize_system: symbol(&handle, "initialize_system")?,
                set_aeration: symbol(&handle, "set_aeration")?,
                compute_with_cosmos: symbol(&handle, "compute_with_cosmos")?,
                _handle: handle,
            })
        }
    }

    /// Caller must pick `T` as the function pointer type of the symbol.
    unsafe fn symbol<T: Copy>(handle: &sys::Handle, name: &str) -> Result<T, String> {
        debug_assert_eq!(
            std::mem::size_of::<T>(),
            std::mem::size_of::<*mut c_void>()
        );
        let ptr = handle.lookup(name)?;
        Ok(std::mem::transmute_copy::<*mut c_void, T>(&ptr))
    }

    #[cfg(unix)]
    mod sys {
        use std::ffi::{c_void, CStr, CString};
        use std::os::unix::ffi::OsStrExt;
        use std::path::Path;

        pub struct Handle(*mut c_void);

        // SAFETY: the handle is only passed to dlsym and dlclose; dlopen handles
        // are process-global and not tied to the opening thread.
        unsafe impl Send for Handle {}
        unsafe impl Sync for Handle {}

        impl Handle {
            pub fn open(path: &Path) -> Result<Self, String> {
                let c_path =
                    CString::new(path.as_os_str().as_bytes()).map_err(|e| e.to_string())?;

                // SAFETY: c_path is a valid NUL-terminated string.
                let raw =
                    unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
                if raw.is_null() {
                    return Err(last_error());
                }
                Ok(Handle(raw))
            }

            pub fn lookup(&self, name: &str) -> Result<*mut c_void, String> {
                let c_name = CString::new(name).map_err(|e| e.to_string())?;
                // SAFETY: self.0 is an open handle and c_name is NUL-terminated.
                let ptr = unsafe { libc::dlsym(self.0, c_name.as_ptr()) };
                if ptr.is_null() {
                    return Err(format!("symbol '{}' not found: {}", name, last_error()));
                }
                Ok(ptr)
            }
        }

        impl Drop for Handle {
            fn drop(&mut self) {
                // SAFETY: self.0 came from a successful dlopen and is closed once.
                unsafe {
                    libc::dlclose(self.0);
                }
            }
        }

        fn last_error() -> String {
            // SAFETY: dlerror returns NULL or a pointer to a NUL-terminated string
            // that stays valid until the next dl* call on this thread.
            unsafe {
                let message = libc::dlerror();
                if message.is_null() {
                    "unknown dynamic loader error".to_string()
                } else {
                    CStr::from_ptr(message).to_string_lossy().into_owned()
                }
            }
        }
    }

    #[cfg(windows)]
    mod sys {
        use std::ffi::{c_char, c_void, CString};
        use std::os::windows::ffi::OsStrExt;
        use std::path::Path;

        #[link(name = "kernel32")]
        extern "system" {
            fn LoadLibraryW(file_name: *const u16) -> *mut c_void;
            fn GetProcAddress(module: *mut c_void, proc_name: *const c_char) -> *mut c_void;
            fn FreeLibrary(module: *mut c_void) -> i32;
        }

        pub struct Handle(*mut c_void);

        // SAFETY: module handles are process-wide and may be used from any thread.
        unsafe impl Send for Handle {}
        unsafe impl Sync for Handle {}

        impl Handle {
            pub fn open(path: &Path) -> Result<Self, String> {
                let wide: Vec<u16> = path
                    .as_os_str()
                    .encode_wide()
                    .chain(std::iter::once(0))
                    .collect();
                if wide[..wide.len() - 1].contains(&0) {
                    return Err("library path contains a NUL character".to_string());
                }

                // SAFETY: wide is a NUL-terminated UTF-16 string.
                let raw = unsafe { LoadLibraryW(wide.as_ptr()) };
                if raw.is_null() {
                    return Err(std::io::Error::last_os_error().to_string());
                }
                Ok(Handle(raw))
            }

            pub fn lookup(&self, name: &str) -> Result<*mut c_void, String> {
                let c_name = CString::new(name).map_err(|e| e.to_string())?;
                // SAFETY: self.0 is a loaded module and c_name is NUL-terminated.
                let ptr = unsafe { GetProcAddress(self.0, c_name.as_ptr()) };
                if ptr.is_null() {
                    return Err(format!(
                        "symbol '{}' not found: {}",
                        name,
                        std::io::Error::last_os_error()
                    ));
                }
                Ok(ptr)
            }
        }

        impl Drop for Handle {
            fn drop(&mut self) {
                // SAFETY: self.0 came from a successful LoadLibraryW and is freed once.
                unsafe {
                    FreeLibrary(self.0);
                }
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    mod sys {
        use std::ffi::c_void;
        use std::path::Path;

        pub enum Handle {}

        impl Handle {
            pub fn open(_path: &Path) -> Result<Self, String> {
                Err("dynamic loading is not supported on this target".to_string())
            }

            pub fn lookup(&self, _name: &str) -> Result<*mut c_void, String> {
                match *self {}
            }
        }
    }
}
