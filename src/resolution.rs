//! Classification of parameter resolutions.
//!
//! A [`ParamResolution`] records how one concrete parameter got its value.
//! It is produced by the structural resolver; this module renders its value,
//! a human-readable remark, and a display [`Category`].

use std::collections::HashSet;
use std::fmt;

use crate::document::ReadonlyDocument;
use crate::lookup::SectionKey;
use crate::ned::{NedAssignment, ResolutionUnavailable};

/// How a parameter obtained its value, with the data each outcome implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No value; NED may declare a default that was not applied.
    Unassigned {
        /// Default declared in NED, if any
        ned_default: Option<NedAssignment>,
    },

    /// Assigned in NED.
    Ned(NedAssignment),

    /// Assigned by an inifile entry, no NED default involved.
    Ini(SectionKey),

    /// An inifile entry `= default` applied the NED default.
    IniDefault {
        /// Entry holding the placeholder
        key: SectionKey,
        /// Default that was applied
        assignment: NedAssignment,
    },

    /// An inifile entry `= ask` defers the value to run time.
    IniAsk {
        /// Entry holding `ask`
        key: SectionKey,
        /// Default declared in NED, if any
        ned_default: Option<NedAssignment>,
    },

    /// An inifile entry overrides a different NED default.
    IniOverride {
        /// Overriding entry
        key: SectionKey,
        /// Overridden default
        ned_default: NedAssignment,
    },

    /// An inifile entry sets the same value as the NED default.
    IniNedDefault {
        /// Entry repeating the default
        key: SectionKey,
        /// Repeated default
        ned_default: NedAssignment,
    },

    /// The NED default applied without any inifile entry.
    ImplicitDefault(NedAssignment),
}

/// Data-free discriminant of [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamResolutionType {
    /// See [`Resolution::Unassigned`].
    Unassigned,
    /// See [`Resolution::Ned`].
    Ned,
    /// See [`Resolution::Ini`].
    Ini,
    /// See [`Resolution::IniDefault`].
    IniDefault,
    /// See [`Resolution::IniAsk`].
    IniAsk,
    /// See [`Resolution::IniOverride`].
    IniOverride,
    /// See [`Resolution::IniNedDefault`].
    IniNedDefault,
    /// See [`Resolution::ImplicitDefault`].
    ImplicitDefault,
}

impl fmt::Display for ParamResolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unassigned => "UNASSIGNED",
            Self::Ned => "NED",
            Self::Ini => "INI",
            Self::IniDefault => "INI_DEFAULT",
            Self::IniAsk => "INI_ASK",
            Self::IniOverride => "INI_OVERRIDE",
            Self::IniNedDefault => "INI_NEDDEFAULT",
            Self::ImplicitDefault => "IMPLICITDEFAULT",
        };
        f.write_str(name)
    }
}

impl Resolution {
    /// Returns the resolution type.
    #[must_use]
    pub const fn kind(&self) -> ParamResolutionType {
        match self {
            Self::Unassigned { .. } => ParamResolutionType::Unassigned,
            Self::Ned(_) => ParamResolutionType::Ned,
            Self::Ini(_) => ParamResolutionType::Ini,
            Self::IniDefault { .. } => ParamResolutionType::IniDefault,
            Self::IniAsk { .. } => ParamResolutionType::IniAsk,
            Self::IniOverride { .. } => ParamResolutionType::IniOverride,
            Self::IniNedDefault { .. } => ParamResolutionType::IniNedDefault,
            Self::ImplicitDefault(_) => ParamResolutionType::ImplicitDefault,
        }
    }

    /// Returns the inifile entry involved, if any.
    #[must_use]
    pub const fn section_key(&self) -> Option<&SectionKey> {
        match self {
            Self::Ini(key)
            | Self::IniDefault { key, .. }
            | Self::IniAsk { key, .. }
            | Self::IniOverride { key, .. }
            | Self::IniNedDefault { key, .. } => Some(key),
            Self::Unassigned { .. } | Self::Ned(_) | Self::ImplicitDefault(_) => None,
        }
    }

    /// Returns the NED assignment involved, if any.
    #[must_use]
    pub const fn ned_assignment(&self) -> Option<&NedAssignment> {
        match self {
            Self::Unassigned { ned_default } | Self::IniAsk { ned_default, .. } => {
                ned_default.as_ref()
            }
            Self::Ned(assignment)
            | Self::ImplicitDefault(assignment)
            | Self::IniDefault { assignment, .. }
            | Self::IniOverride {
                ned_default: assignment,
                ..
            }
            | Self::IniNedDefault {
                ned_default: assignment,
                ..
            } => Some(assignment),
            Self::Ini(_) => None,
        }
    }
}

/// The resolution of one concrete parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamResolution {
    /// Full path of the parameter (`Net.host[0].nic.mac.address`)
    pub param_full_path: String,
    /// How the value was obtained
    pub resolution: Resolution,
}

impl ParamResolution {
    /// Creates a resolution record.
    #[must_use]
    pub fn new(param_full_path: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            param_full_path: param_full_path.into(),
            resolution,
        }
    }

    /// Returns the resolution type.
    #[must_use]
    pub const fn kind(&self) -> ParamResolutionType {
        self.resolution.kind()
    }
}

/// Returns the value a parameter resolved to.
///
/// `None` for unassigned and `ask` parameters, and for an inifile entry
/// that no longer exists in `doc`.
#[must_use]
pub fn param_value<D>(res: &ParamResolution, doc: &D) -> Option<String>
where
    D: ReadonlyDocument + ?Sized,
{
    match &res.resolution {
        Resolution::Unassigned { .. } | Resolution::IniAsk { .. } => None,
        Resolution::Ned(assignment)
        | Resolution::IniDefault { assignment, .. }
        | Resolution::ImplicitDefault(assignment) => Some(assignment.value.clone()),
        Resolution::Ini(key)
        | Resolution::IniOverride { key, .. }
        | Resolution::IniNedDefault { key, .. } => {
            doc.value(&key.section, &key.key).map(str::to_string)
        }
    }
}

/// Like [`param_value`], but shows `(unassigned)` and `(ask)` placeholders.
#[must_use]
pub fn param_display_value<D>(res: &ParamResolution, doc: &D) -> String
where
    D: ReadonlyDocument + ?Sized,
{
    match res.resolution {
        Resolution::Unassigned { .. } => "(unassigned)".to_string(),
        Resolution::IniAsk { .. } => "(ask)".to_string(),
        _ => param_value(res, doc).unwrap_or_default(),
    }
}

/// Describes how a parameter got its value.
///
/// # Examples
///
/// ```
/// use ini_resolve::document::{MemoryDocument, Section};
/// use ini_resolve::lookup::SectionKey;
/// use ini_resolve::ned::NedAssignment;
/// use ini_resolve::resolution::{param_remark, ParamResolution, Resolution};
///
/// let doc = MemoryDocument::from_sections(vec![
///     Section::new("General").with_entry("**.power", "2mW"),
/// ]).unwrap();
/// let res = ParamResolution::new("Net.host.power", Resolution::IniOverride {
///     key: SectionKey::new("General", "**.power"),
///     ned_default: NedAssignment::new("1mW", "Host"),
/// });
///
/// assert_eq!(
///     param_remark(&res, &doc),
///     "ini (overrides NED default: 1mW); see [General] / **.power=2mW"
/// );
/// ```
#[must_use]
pub fn param_remark<D>(res: &ParamResolution, doc: &D) -> String
where
    D: ReadonlyDocument + ?Sized,
{
    let ned_default_suffix = |default: Option<&NedAssignment>| {
        default
            .map(|a| format!(" (NED default: {})", a.value))
            .unwrap_or_default()
    };

    let mut remark = match &res.resolution {
        Resolution::Unassigned { ned_default } => {
            format!("unassigned{}", ned_default_suffix(ned_default.as_ref()))
        }
        Resolution::Ned(_) => "NED".to_string(),
        Resolution::Ini(_) => "ini".to_string(),
        Resolution::IniAsk { ned_default, .. } => format!("ask{}", ned_default_suffix(ned_default.as_ref())),
        Resolution::IniDefault { .. } => "NED default applied".to_string(),
        Resolution::IniOverride { ned_default, .. } => {
            format!("ini (overrides NED default: {})", ned_default.value)
        }
        Resolution::IniNedDefault { .. } => "ini (sets same value as NED default)".to_string(),
        Resolution::ImplicitDefault(_) => "NED default applied implicitly".to_string(),
    };

    if let Some(key) = res.resolution.section_key() {
        let value = doc.value(&key.section, &key.key).unwrap_or_default();
        remark.push_str(&format!("; see [{}] / {}={value}", key.section, key.key));
    } else if let Some(assignment) = res.resolution.ned_assignment().filter(|a| a.is_pattern) {
        remark.push_str(&format!(
            "; see ({}) / {}",
            assignment.enclosing_type,
            assignment.source.trim()
        ));
    }
    remark
}

/// Display category of a parameter or of an inifile key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unassigned parameter
    Unassigned,
    /// Value from NED
    Ned,
    /// Value from the inifile
    Ini,
    /// NED default applied via `= default`
    IniDefault,
    /// Value asked at run time
    IniAsk,
    /// Inifile value overriding a NED default
    IniOverride,
    /// Inifile value equal to the NED default
    IniNedDefault,
    /// NED default applied implicitly
    ImplicitDefault,
    /// A key whose matched parameters resolved in different ways
    Mixed,
    /// Resolution was unavailable
    Unknown,
}

impl Category {
    /// Returns a stable identifier for the category's glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Unassigned => "par_unassigned",
            Self::Ned => "par_ned",
            Self::Ini => "par_ini",
            Self::IniDefault => "par_neddefault",
            Self::IniAsk => "par_iniask",
            Self::IniOverride => "par_inioverride",
            Self::IniNedDefault => "par_inineddefault",
            Self::ImplicitDefault => "par_implicitdefault",
            Self::Mixed => "par_inimisc",
            Self::Unknown => "par_unknown",
        }
    }
}

impl From<ParamResolutionType> for Category {
    fn from(kind: ParamResolutionType) -> Self {
        match kind {
            ParamResolutionType::Unassigned => Self::Unassigned,
            ParamResolutionType::Ned => Self::Ned,
            ParamResolutionType::Ini => Self::Ini,
            ParamResolutionType::IniDefault => Self::IniDefault,
            ParamResolutionType::IniAsk => Self::IniAsk,
            ParamResolutionType::IniOverride => Self::IniOverride,
            ParamResolutionType::IniNedDefault => Self::IniNedDefault,
            ParamResolutionType::ImplicitDefault => Self::ImplicitDefault,
        }
    }
}

/// Aggregates the resolutions of the parameters an inifile key matched.
///
/// A key that matched nothing is a plain inifile entry; a key whose
/// parameters all resolved the same way takes that category.
#[must_use]
pub fn category_for_key(resolutions: Result<&[ParamResolution], ResolutionUnavailable>) -> Category {
    let Ok(resolutions) = resolutions else {
        return Category::Unknown;
    };
    let kinds: HashSet<_> = resolutions.iter().map(ParamResolution::kind).collect();
    match kinds.len() {
        0 => Category::Ini,
        1 => resolutions[0].kind().into(),
        _ => Category::Mixed,
    }
}
