//! Generic XML tree codec
//!
//! Every typed node implements [`XmlElement`]: decoding starts from an
//! already-read start tag and consumes through the matching end tag;
//! encoding writes the whole element under the name chosen by the parent,
//! which lets one node type serve several element names.

pub mod reader;
pub mod value;
pub mod writer;

pub use reader::{Attr, StartTag, XmlReader};
pub use value::{OnOff, Val, XmlValue};
pub use writer::{Attrs, XmlWriter};

use crate::error::Result;

/// A node that maps to one XML element
pub trait XmlElement: Sized {
    /// Decode from `start`, consuming the element's content and end tag
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self>;

    /// Encode as an element called `name`
    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()>;
}

impl<T: XmlElement> XmlElement for Box<T> {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        T::decode(reader, start).map(Box::new)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        (**self).encode(writer, name)
    }
}

/// Decode `tag` into an optional slot
pub(crate) fn decode_into<T: XmlElement>(
    slot: &mut Option<T>,
    reader: &mut XmlReader<'_>,
    tag: &StartTag,
) -> Result<()> {
    *slot = Some(T::decode(reader, tag)?);
    Ok(())
}

/// Encode an optional node, writing nothing when absent
pub(crate) fn encode_opt<T: XmlElement>(
    writer: &mut XmlWriter,
    name: &str,
    node: &Option<T>,
) -> Result<()> {
    match node {
        Some(node) => node.encode(writer, name),
        None => Ok(()),
    }
}

/// Local part of a qualified attribute name (`w:val` → `val`)
pub(crate) fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

/// Declare a container whose content is an ordered sequence of optional
/// WordprocessingML child elements
///
/// Fields are encoded in declaration order, which must follow the schema
/// sequence. Decoding dispatches on the child's local name (extra spellings
/// after `|` are accepted) and skips anything not listed. A repeated child
/// replaces the earlier one.
macro_rules! xml_sequence {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty => $xml:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )+
        }

        impl $crate::xml::XmlElement for $name {
            fn decode(
                reader: &mut $crate::xml::XmlReader<'_>,
                start: &$crate::xml::StartTag,
            ) -> $crate::error::Result<Self> {
                let mut node = Self::default();
                while let Some(tag) = reader.next_element(start)? {
                    match (tag.family, tag.local.as_str()) {
                        $(
                            ($crate::namespace::NsFamily::Wml, $xml $(| $alias)*) => {
                                $crate::xml::decode_into(&mut node.$field, reader, &tag)?
                            }
                        )+
                        _ => reader.skip_unknown(start, &tag)?,
                    }
                }
                Ok(node)
            }

            fn encode(
                &self,
                writer: &mut $crate::xml::XmlWriter,
                name: &str,
            ) -> $crate::error::Result<()> {
                writer.start(name, $crate::xml::Attrs::new())?;
                $(
                    $crate::xml::encode_opt(writer, concat!("w:", $xml), &self.$field)?;
                )+
                writer.end(name)
            }
        }
    };
}

/// Declare an attribute-only element
///
/// Each field names its qualified attribute; decoding matches on the local
/// part only. `Option` fields are optional and omitted when `None`; any
/// other type is required. Child elements are ignored.
macro_rules! xml_attributes {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty => $xml:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )+
        }

        impl $crate::xml::XmlElement for $name {
            fn decode(
                reader: &mut $crate::xml::XmlReader<'_>,
                start: &$crate::xml::StartTag,
            ) -> $crate::error::Result<Self> {
                let node = Self {
                    $(
                        $field: reader.required_attr(start, $crate::xml::local_name($xml))?,
                    )+
                };
                reader.skip(start)?;
                Ok(node)
            }

            fn encode(
                &self,
                writer: &mut $crate::xml::XmlWriter,
                name: &str,
            ) -> $crate::error::Result<()> {
                writer.empty(
                    name,
                    $crate::xml::Attrs::new()$(.with($xml, &self.$field))+,
                )
            }
        }
    };
}

pub(crate) use {xml_attributes, xml_sequence};
