//! Foreign string copy-out
//!
//! Every CXString obtained from the library passes through here: copy the
//! bytes into an owned `String`, dispose the foreign string, return. The
//! foreign handle never escapes this function, so there is exactly one
//! release point per acquisition.

use std::ffi::CStr;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::CXString;

/// Copy a foreign string into an owned `String` and dispose it.
///
/// A null backing pointer (libclang's "no text" sentinel) yields an empty
/// string.
pub fn owned_string(api: &dyn LibclangApi, string: CXString) -> String {
    let c_str = api.get_cstring(string);
    let result = if c_str.is_null() {
        String::new()
    } else {
        // lossy: libclang emits UTF-8 but file contents may not be
        unsafe { CStr::from_ptr(c_str) }
            .to_string_lossy()
            .into_owned()
    };
    api.dispose_string(string);
    result
}
