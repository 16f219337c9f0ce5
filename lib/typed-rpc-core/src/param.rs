//! Scalar formatting for path, query and header values.
//!
//! Only string-convertible scalars may be routed outside the body. The
//! representation is deterministic and locale-independent: integers in
//! decimal, floats through `Display`, booleans as `true`/`false`, strings
//! verbatim.

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A value that can be written to a path segment, query pair or header.
pub trait ToParam {
    /// Canonical string form, `None` when the value is absent and must be skipped.
    fn to_param(&self) -> Option<String>;
}

/// A value that can be read back from a path segment, query pair or header.
pub trait FromParam: Sized {
    /// Parse the canonical string form.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] describing why `raw` is not a valid value.
    fn from_param(raw: &str) -> Result<Self, ParamError>;
}

/// Parse failure of a scalar parameter.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{_0}")]
pub struct ParamError(#[error(not(source))] String);

impl ParamError {
    /// Create a new parse failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

macro_rules! display_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToParam for $ty {
                fn to_param(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }

            impl FromParam for $ty {
                fn from_param(raw: &str) -> Result<Self, ParamError> {
                    raw.parse::<$ty>().map_err(|e| ParamError::new(e.to_string()))
                }
            }
        )*
    };
}

display_param!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
);

impl ToParam for str {
    fn to_param(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl ToParam for Cow<'_, str> {
    fn to_param(&self) -> Option<String> {
        Some(self.as_ref().to_owned())
    }
}

impl<T: ToParam> ToParam for Option<T> {
    fn to_param(&self) -> Option<String> {
        self.as_ref().and_then(ToParam::to_param)
    }
}

impl<T: FromParam> FromParam for Option<T> {
    fn from_param(raw: &str) -> Result<Self, ParamError> {
        T::from_param(raw).map(Some)
    }
}

impl<T: ToParam + ?Sized> ToParam for &T {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Box<T> {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Rc<T> {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Arc<T> {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: FromParam> FromParam for Box<T> {
    fn from_param(raw: &str) -> Result<Self, ParamError> {
        T::from_param(raw).map(Self::new)
    }
}
