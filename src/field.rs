//! Declared-field metadata and its classification.
//!
//! A tag follows the `"<flat name>,<setting>,<setting>"` layout. The first
//! component renames the field (empty keeps the declared name, `-` drops the
//! field entirely), the rest are settings such as `inline` or `omitempty`.

const SKIP: &str = "-";
const INLINE: &str = "inline";
const OMIT_EMPTY: &[&str] = &["omitempty", "omitzero"];

/// One declared field of a record type, as written in its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    /// Name of the field in the declaration.
    pub name: &'static str,
    /// Whether the field is visible outside its module.
    pub public: bool,
    /// Raw tag, e.g. `"city,omitempty"` or `",inline"`.
    pub tag: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub skip: bool,
    /// Key the field is written under. Meaningless for inline fields, whose
    /// sub-fields bring their own keys.
    pub name: &'a str,
    pub inline: bool,
    pub omit_empty: bool,
}

impl Field {
    pub fn tag_name(&self) -> &'static str {
        self.tag.split(',').next().unwrap_or_default()
    }

    pub fn settings(&self) -> impl Iterator<Item = &'static str> {
        self.tag.split(',').skip(1).map(str::trim)
    }

    pub fn has_setting(&self, setting: &str) -> bool {
        self.settings().any(|s| s == setting)
    }
}

pub fn classify(field: &Field) -> Classification<'static> {
    let tag_name = field.tag_name();
    Classification {
        skip: !field.public || tag_name == SKIP,
        name: match tag_name {
            "" => field.name,
            renamed => renamed,
        },
        inline: field.has_setting(INLINE),
        omit_empty: OMIT_EMPTY.iter().any(|s| field.has_setting(s)),
    }
}
