//! Attribute value conversion and the generic single-value element
//!
//! Dozens of WordprocessingML elements carry nothing but one `w:val`
//! attribute (`<w:pStyle w:val="Heading1"/>`, `<w:sz w:val="24"/>`,
//! `<w:jc w:val="center"/>`, `<w:b/>`). They all share [`Val<T>`],
//! parameterised by the attribute's value type.

use std::borrow::Cow;

use crate::error::Result;
use crate::xml::reader::{StartTag, XmlReader};
use crate::xml::writer::{Attrs, XmlWriter};
use crate::xml::XmlElement;

/// A type that can be read from and written to an XML attribute value
pub trait XmlValue: Sized {
    /// Parse the raw (unescaped) attribute text
    fn parse_xml(raw: &str) -> Option<Self>;

    /// Attribute text, or `None` to omit the attribute entirely
    fn to_xml(&self) -> Option<Cow<'_, str>>;

    /// Value to use when the attribute is absent; `None` makes it required
    fn from_missing() -> Option<Self> {
        None
    }
}

impl XmlValue for String {
    fn parse_xml(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_xml(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

macro_rules! numeric_xml_value {
    ($($ty:ty),+) => {
        $(
            impl XmlValue for $ty {
                fn parse_xml(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }

                fn to_xml(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )+
    };
}

numeric_xml_value!(u8, u16, u32, u64, i32, i64);

/// `ST_OnOff`: `true`/`false`, `1`/`0`, `on`/`off`
impl XmlValue for bool {
    fn parse_xml(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "true" | "on" => Some(true),
            "0" | "false" | "off" => Some(false),
            _ => None,
        }
    }

    fn to_xml(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "true" } else { "false" }))
    }
}

/// Optional value: absence is valid and round-trips as absence
impl<T: XmlValue> XmlValue for Option<T> {
    fn parse_xml(raw: &str) -> Option<Self> {
        T::parse_xml(raw).map(Some)
    }

    fn to_xml(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|v| v.to_xml())
    }

    fn from_missing() -> Option<Self> {
        Some(None)
    }
}

/// Generic element carrying a single `w:val` attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Val<T> {
    pub val: T,
}

impl<T> Val<T> {
    pub fn new(val: T) -> Self {
        Self { val }
    }
}

impl<T: XmlValue> XmlElement for Val<T> {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let val = reader.required_attr(start, "val")?;
        reader.skip(start)?;
        Ok(Self { val })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.empty(name, Attrs::new().with("w:val", &self.val))
    }
}

/// On/off toggle such as `<w:b/>` or `<w:b w:val="false"/>`
///
/// A missing `w:val` means "on" and is preserved as missing.
pub type OnOff = Val<Option<bool>>;

impl Val<Option<bool>> {
    /// Toggle written as a bare element (`<w:b/>`)
    pub fn on() -> Self {
        Self { val: None }
    }

    /// Toggle explicitly switched off (`<w:b w:val="false"/>`)
    pub fn off() -> Self {
        Self { val: Some(false) }
    }

    /// Effective state of the toggle
    pub fn is_on(&self) -> bool {
        self.val.unwrap_or(true)
    }
}

/// Declare a closed `ST_*` enumeration with its XML spellings
///
/// Extra spellings after `|` are accepted on input (e.g. strict-schema
/// synonyms) and normalised to the first spelling on output.
macro_rules! xml_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $xml:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// XML spelling of this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $xml,)+
                }
            }
        }

        impl $crate::xml::value::XmlValue for $name {
            fn parse_xml(raw: &str) -> Option<Self> {
                match raw {
                    $($xml $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn to_xml(&self) -> Option<std::borrow::Cow<'_, str>> {
                Some(std::borrow::Cow::Borrowed(self.as_str()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use xml_enum;

#[cfg(test)]
mod tests {
    use super::*;

    xml_enum! {
        pub enum Fruit {
            Apple => "apple" | "pomme",
            Pear => "pear",
        }
    }

    #[test]
    fn test_bool_spellings() {
        for raw in ["1", "true", "on"] {
            assert_eq!(bool::parse_xml(raw), Some(true));
        }
        for raw in ["0", "false", "off"] {
            assert_eq!(bool::parse_xml(raw), Some(false));
        }
        assert_eq!(bool::parse_xml("yes"), None);
    }

    #[test]
    fn test_option_is_not_required() {
        assert_eq!(<Option<u32>>::from_missing(), Some(None));
        assert_eq!(<u32>::from_missing(), None);
        assert!(None::<u32>.to_xml().is_none());
    }

    #[test]
    fn test_enum_aliases_normalise() {
        assert_eq!(Fruit::parse_xml("pomme"), Some(Fruit::Apple));
        assert_eq!(Fruit::Apple.to_xml().unwrap(), "apple");
        assert_eq!(Fruit::parse_xml("plum"), None);
        assert_eq!(Fruit::Pear.to_string(), "pear");
    }

    #[test]
    fn test_on_off_state() {
        assert!(OnOff::on().is_on());
        assert!(!OnOff::off().is_on());
        assert!(OnOff::new(Some(true)).is_on());
    }
}
