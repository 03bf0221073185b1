//! Conversions between task attribute values and settings strings

use std::path::PathBuf;

/// A task attribute value that can be written into the settings store
///
/// `to_setting` returns `None` when the value must not be applied: an unset
/// `Option` or an empty string.
pub trait PropertyValue {
    fn to_setting(&self) -> Option<String>;
}

impl PropertyValue for str {
    fn to_setting(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl PropertyValue for String {
    fn to_setting(&self) -> Option<String> {
        self.as_str().to_setting()
    }
}

impl PropertyValue for PathBuf {
    fn to_setting(&self) -> Option<String> {
        self.to_string_lossy().to_setting()
    }
}

impl PropertyValue for bool {
    fn to_setting(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: PropertyValue + ?Sized> PropertyValue for &T {
    fn to_setting(&self) -> Option<String> {
        (**self).to_setting()
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn to_setting(&self) -> Option<String> {
        self.as_ref().and_then(PropertyValue::to_setting)
    }
}

/// A task attribute type that can be parsed from the string the host build
/// system hands over
pub trait FromProperty: Sized {
    fn from_property(value: &str) -> Result<Self, String>;
}

impl FromProperty for String {
    fn from_property(value: &str) -> Result<Self, String> {
        Ok(value.to_string())
    }
}

impl FromProperty for PathBuf {
    fn from_property(value: &str) -> Result<Self, String> {
        Ok(PathBuf::from(value))
    }
}

impl FromProperty for bool {
    /// Accepts `true`/`yes`/`on` and `false`/`no`/`off`, case-insensitively
    fn from_property(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(true),
            "false" | "no" | "off" => Ok(false),
            other => Err(format!("expected a boolean, got '{other}'")),
        }
    }
}

impl<T: FromProperty> FromProperty for Option<T> {
    /// An empty value unsets the attribute
    fn from_property(value: &str) -> Result<Self, String> {
        if value.is_empty() {
            return Ok(None);
        }
        T::from_property(value).map(Some)
    }
}

macro_rules! integer_property {
    ($($ty:ty),*) => {
        $(
            impl PropertyValue for $ty {
                fn to_setting(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }

            impl FromProperty for $ty {
                fn from_property(value: &str) -> Result<Self, String> {
                    value
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("expected an integer, got '{value}': {e}"))
                }
            }
        )*
    };
}

integer_property!(u16, u32, u64, usize, i32, i64);
