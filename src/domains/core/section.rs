//! Partial-update protocol shared by every accordion, step and record.
//!
//! A section is a plain struct of fields; its `Patch` is the same shape with
//! every field optional. `merge` applies a patch field by field:
//!
//! * `value(T)` / `list(T)`: assigned wholesale (lists are replaced, never unioned)
//! * `assessment`: the nested condition triple, merged key by key
//! * `merge(T)`: an always-present nested section, merged recursively
//! * `nested(T)`: an optional nested section, installed from the patch on first use
//!
//! Fields absent from the patch are left untouched.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use super::assessment::AssessmentTriple;

pub trait Section: Default + Clone + PartialEq + Debug + Serialize + DeserializeOwned {
    type Patch: Default + Clone + PartialEq + Debug + Serialize + DeserializeOwned;

    /// Apply `patch`; returns true if any stored value changed.
    fn merge(&mut self, patch: Self::Patch) -> bool;

    /// Push every condition triple reachable from this section.
    fn collect_assessments<'a>(&'a self, out: &mut Vec<&'a AssessmentTriple>);
}

/// Wholesale assignment
pub fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Merge into an optional nested section, constructing it from defaults if it
/// does not exist yet.
pub fn merge_nested<S: Section>(slot: &mut Option<S>, patch: S::Patch) -> bool {
    match slot {
        Some(section) => section.merge(patch),
        None => {
            let mut section = S::default();
            section.merge(patch);
            *slot = Some(section);
            true
        }
    }
}

/// Declare a section struct together with its patch type.
///
/// ```ignore
/// section! {
///     pub struct RoofAccess / RoofAccessPatch {
///         access_type: list(String),
///         railing: value(Option<YesNo>),
///         railing_details: nested(RailingDetails),
///         assessment: assessment,
///     }
/// }
/// ```
///
/// An optional `collections { .. }` block adds record collections that are
/// serialized with the section but only mutated through their own
/// add/update/remove operations, never through the patch.
macro_rules! section {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $patch:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $kind:ident $(( $ty:ty ))?
            ),* $(,)?
        }
        $(
            collections {
                $(
                    $(#[$cmeta:meta])*
                    $cfield:ident : $cty:ty
                ),* $(,)?
            }
        )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $crate::domains::core::section!(@ty $kind $(( $ty ))?),
            )*
            $($(
                $(#[$cmeta])*
                pub $cfield: $cty,
            )*)?
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`]")]
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase", deny_unknown_fields)]
        pub struct $patch {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$crate::domains::core::section!(@patch $kind $(( $ty ))?)>,
            )*
        }

        impl $crate::domains::core::Section for $name {
            type Patch = $patch;

            #[allow(unused_mut, unused_variables)]
            fn merge(&mut self, patch: $patch) -> bool {
                let mut changed = false;
                $(
                    if let Some(value) = patch.$field {
                        changed |= $crate::domains::core::section!(@merge $kind, self.$field, value);
                    }
                )*
                changed
            }

            #[allow(unused_variables)]
            fn collect_assessments<'a>(
                &'a self,
                out: &mut Vec<&'a $crate::domains::core::AssessmentTriple>,
            ) {
                $( $crate::domains::core::section!(@collect $kind, self.$field, out); )*
                $($( self.$cfield.collect_assessments(out); )*)?
            }
        }
    };

    (@ty value ( $ty:ty )) => { $ty };
    (@ty list ( $ty:ty )) => { Vec<$ty> };
    (@ty assessment) => { $crate::domains::core::AssessmentTriple };
    (@ty merge ( $ty:ty )) => { $ty };
    (@ty nested ( $ty:ty )) => { Option<$ty> };

    (@patch value ( $ty:ty )) => { $ty };
    (@patch list ( $ty:ty )) => { Vec<$ty> };
    (@patch assessment) => { $crate::domains::core::AssessmentPatch };
    (@patch merge ( $ty:ty )) => { <$ty as $crate::domains::core::Section>::Patch };
    (@patch nested ( $ty:ty )) => { <$ty as $crate::domains::core::Section>::Patch };

    (@merge value, $slot:expr, $value:expr) => {
        $crate::domains::core::section::assign(&mut $slot, $value)
    };
    (@merge list, $slot:expr, $value:expr) => {
        $crate::domains::core::section::assign(&mut $slot, $value)
    };
    (@merge assessment, $slot:expr, $value:expr) => {
        $crate::domains::core::Section::merge(&mut $slot, $value)
    };
    (@merge merge, $slot:expr, $value:expr) => {
        $crate::domains::core::Section::merge(&mut $slot, $value)
    };
    (@merge nested, $slot:expr, $value:expr) => {
        $crate::domains::core::section::merge_nested(&mut $slot, $value)
    };

    (@collect value, $slot:expr, $out:ident) => {};
    (@collect list, $slot:expr, $out:ident) => {};
    (@collect assessment, $slot:expr, $out:ident) => {
        $out.push(&$slot)
    };
    (@collect merge, $slot:expr, $out:ident) => {
        $crate::domains::core::Section::collect_assessments(&$slot, $out)
    };
    (@collect nested, $slot:expr, $out:ident) => {
        if let Some(section) = &$slot {
            $crate::domains::core::Section::collect_assessments(section, $out)
        }
    };
}

pub(crate) use section;
