//! Typed parameter slots.
//!
//! Every element attribute is stored in one of four slot kinds:
//!
//! - [`Required`]: always present, set at construction.
//! - [`Optional`]: absent until set.
//! - [`Defaulted`]: always present; reads a registered default until set.
//! - [`Vector`]: an ordered list that never holds two equal values.
//!
//! A parameter *kind* is its value type (e.g. [`Start`](super::Start)), so the
//! generic accessors on [`Parameters`] dispatch purely on the type you ask for:
//!
//! ```
//! use admgraph::model::{AudioProgramme, Parameters, Start, Time};
//!
//! let mut programme = AudioProgramme::new("Main");
//! assert!(programme.is_default::<Start>());
//!
//! programme.set(Start(Time::from_secs(2)));
//! assert_eq!(programme.get::<Start>().unwrap(), Start(Time::from_secs(2)));
//!
//! programme.unset::<Start>();
//! assert!(programme.is_default::<Start>());
//! ```

use std::fmt;

use crate::error::AdmError;

/// A parameter kind. The implementing type is the value stored in the slot.
pub trait Parameter: Clone + PartialEq + fmt::Debug {
    /// Attribute name, used in error messages.
    const NAME: &'static str;
}

/// A parameter kind with a statically registered default.
pub trait DefaultParameter: Parameter {
    fn default_value() -> Self;
}

impl<P: Parameter> Parameter for Vec<P> {
    const NAME: &'static str = P::NAME;
}

/// A slot whose value is always present.
#[derive(Clone, Debug, PartialEq)]
pub struct Required<P>(P);

impl<P: Parameter> Required<P> {
    pub fn new(value: P) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &P {
        &self.0
    }

    pub fn set(&mut self, value: P) {
        self.0 = value;
    }
}

/// A slot that is absent until explicitly set.
#[derive(Clone, Debug, PartialEq)]
pub struct Optional<P>(Option<P>);

impl<P> Default for Optional<P> {
    fn default() -> Self {
        Self(None)
    }
}

impl<P: Parameter> Optional<P> {
    pub fn get(&self) -> Result<P, AdmError> {
        self.0.clone().ok_or(AdmError::NotSet { parameter: P::NAME })
    }

    pub fn value(&self) -> Option<&P> {
        self.0.as_ref()
    }

    pub fn has(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, value: P) {
        self.0 = Some(value);
    }

    pub fn unset(&mut self) {
        self.0 = None;
    }
}

/// A slot that falls back to [`DefaultParameter::default_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct Defaulted<P>(Option<P>);

impl<P> Default for Defaulted<P> {
    fn default() -> Self {
        Self(None)
    }
}

impl<P: DefaultParameter> Defaulted<P> {
    pub fn get(&self) -> P {
        self.0.clone().unwrap_or_else(P::default_value)
    }

    pub fn is_default(&self) -> bool {
        self.0.is_none()
    }

    pub fn set(&mut self, value: P) {
        self.0 = Some(value);
    }

    /// Forget the explicit value; reads return the default again.
    pub fn unset(&mut self) {
        self.0 = None;
    }
}

/// An ordered, de-duplicated list of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector<P>(Vec<P>);

impl<P> Default for Vector<P> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<P: Parameter> Vector<P> {
    pub fn get(&self) -> Vec<P> {
        self.0.clone()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.0
    }

    pub fn has(&self) -> bool {
        !self.0.is_empty()
    }

    /// Replace the contents, dropping later duplicates.
    pub fn set(&mut self, values: Vec<P>) {
        self.0.clear();
        for value in values {
            self.add(value);
        }
    }

    pub fn unset(&mut self) {
        self.0.clear();
    }

    /// Append `value` unless an equal value is already present.
    pub fn add(&mut self, value: P) -> bool {
        if self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn remove(&mut self, value: &P) -> bool {
        match self.0.iter().position(|v| v == value) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Read access to the parameter of kind `P`.
pub trait HasParameter<P: Parameter> {
    fn get_parameter(&self) -> Result<P, AdmError>;

    fn has_parameter(&self) -> bool;

    /// Only defaulted slots ever report `true`.
    fn is_default_parameter(&self) -> bool {
        false
    }
}

pub trait SetParameter<P: Parameter>: HasParameter<P> {
    fn set_parameter(&mut self, value: P);
}

/// Implemented by optional, defaulted and vector slots. Required slots
/// deliberately have no impl, so unsetting them does not compile.
pub trait UnsetParameter<P: Parameter>: HasParameter<P> {
    fn unset_parameter(&mut self);
}

pub trait VectorParameter<P: Parameter>: HasParameter<Vec<P>> {
    fn add_parameter(&mut self, value: P) -> bool;

    fn remove_parameter(&mut self, value: &P) -> bool;
}

/// Uniform, type-dispatched access to element parameters.
pub trait Parameters {
    /// Returns the value of `P`, or [`AdmError::NotSet`] if absent without default.
    fn get<P: Parameter>(&self) -> Result<P, AdmError>
    where
        Self: HasParameter<P>,
    {
        <Self as HasParameter<P>>::get_parameter(self)
    }

    fn has<P: Parameter>(&self) -> bool
    where
        Self: HasParameter<P>,
    {
        <Self as HasParameter<P>>::has_parameter(self)
    }

    fn is_default<P: Parameter>(&self) -> bool
    where
        Self: HasParameter<P>,
    {
        <Self as HasParameter<P>>::is_default_parameter(self)
    }

    fn set<P: Parameter>(&mut self, value: P)
    where
        Self: SetParameter<P>,
    {
        <Self as SetParameter<P>>::set_parameter(self, value)
    }

    fn unset<P: Parameter>(&mut self)
    where
        Self: UnsetParameter<P>,
    {
        <Self as UnsetParameter<P>>::unset_parameter(self)
    }

    /// Adds `value` to a vector parameter; `false` if an equal value exists.
    fn add<P: Parameter>(&mut self, value: P) -> bool
    where
        Self: VectorParameter<P>,
    {
        <Self as VectorParameter<P>>::add_parameter(self, value)
    }

    fn remove<P: Parameter>(&mut self, value: &P) -> bool
    where
        Self: VectorParameter<P>,
    {
        <Self as VectorParameter<P>>::remove_parameter(self, value)
    }
}

/// Generates the parameter trait impls for the slot fields of an element.
///
/// ```ignore
/// impl_parameters!(AudioProgramme {
///     name: Required(Name),
///     start: Defaulted(Start),
///     loudness: Vector(LoudnessMetadata),
/// });
/// ```
macro_rules! impl_parameters {
    ($owner:ty { $($field:ident : $kind:ident ( $param:ty )),* $(,)? }) => {
        impl $crate::model::params::Parameters for $owner {}
        $( $crate::model::params::impl_parameters!(@slot $owner, $field, $kind, $param); )*
    };
    (@slot $owner:ty, $field:ident, Required, $param:ty) => {
        impl $crate::model::params::HasParameter<$param> for $owner {
            fn get_parameter(&self) -> Result<$param, $crate::error::AdmError> {
                Ok(self.$field.value().clone())
            }
            fn has_parameter(&self) -> bool {
                true
            }
        }
        impl $crate::model::params::SetParameter<$param> for $owner {
            fn set_parameter(&mut self, value: $param) {
                self.$field.set(value);
            }
        }
    };
    (@slot $owner:ty, $field:ident, Optional, $param:ty) => {
        impl $crate::model::params::HasParameter<$param> for $owner {
            fn get_parameter(&self) -> Result<$param, $crate::error::AdmError> {
                self.$field.get()
            }
            fn has_parameter(&self) -> bool {
                self.$field.has()
            }
        }
        impl $crate::model::params::SetParameter<$param> for $owner {
            fn set_parameter(&mut self, value: $param) {
                self.$field.set(value);
            }
        }
        impl $crate::model::params::UnsetParameter<$param> for $owner {
            fn unset_parameter(&mut self) {
                self.$field.unset();
            }
        }
    };
    (@slot $owner:ty, $field:ident, Defaulted, $param:ty) => {
        impl $crate::model::params::HasParameter<$param> for $owner {
            fn get_parameter(&self) -> Result<$param, $crate::error::AdmError> {
                Ok(self.$field.get())
            }
            fn has_parameter(&self) -> bool {
                true
            }
            fn is_default_parameter(&self) -> bool {
                self.$field.is_default()
            }
        }
        impl $crate::model::params::SetParameter<$param> for $owner {
            fn set_parameter(&mut self, value: $param) {
                self.$field.set(value);
            }
        }
        impl $crate::model::params::UnsetParameter<$param> for $owner {
            fn unset_parameter(&mut self) {
                self.$field.unset();
            }
        }
    };
    (@slot $owner:ty, $field:ident, Vector, $param:ty) => {
        impl $crate::model::params::HasParameter<Vec<$param>> for $owner {
            fn get_parameter(&self) -> Result<Vec<$param>, $crate::error::AdmError> {
                Ok(self.$field.get())
            }
            fn has_parameter(&self) -> bool {
                self.$field.has()
            }
        }
        impl $crate::model::params::SetParameter<Vec<$param>> for $owner {
            fn set_parameter(&mut self, values: Vec<$param>) {
                self.$field.set(values);
            }
        }
        impl $crate::model::params::UnsetParameter<Vec<$param>> for $owner {
            fn unset_parameter(&mut self) {
                self.$field.unset();
            }
        }
        impl $crate::model::params::VectorParameter<$param> for $owner {
            fn add_parameter(&mut self, value: $param) -> bool {
                self.$field.add(value)
            }
            fn remove_parameter(&mut self, value: &$param) -> bool {
                self.$field.remove(value)
            }
        }
    };
}

pub(crate) use impl_parameters;

/// Registers the default value of each defaulted parameter kind.
macro_rules! defaults {
    ($($param:ty => $value:expr),* $(,)?) => {
        $(
            impl $crate::model::params::DefaultParameter for $param {
                fn default_value() -> Self {
                    $value
                }
            }
        )*
    };
}

pub(crate) use defaults;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Label(String);

    impl Parameter for Label {
        const NAME: &'static str = "label";
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Level(u8);

    impl Parameter for Level {
        const NAME: &'static str = "level";
    }

    defaults! {
        Level => Level(3),
    }

    #[derive(Clone, Debug)]
    struct Widget {
        label: Required<Label>,
        note: Optional<Label>,
        level: Defaulted<Level>,
        tags: Vector<Level>,
    }

    // `note` and `label` share a kind, so only `label` is exposed generically.
    impl_parameters!(Widget {
        label: Required(Label),
        level: Defaulted(Level),
        tags: Vector(Level),
    });

    fn widget() -> Widget {
        Widget {
            label: Required::new(Label("w".into())),
            note: Optional::default(),
            level: Defaulted::default(),
            tags: Vector::default(),
        }
    }

    #[test]
    fn test_required_slot_is_always_present() {
        let mut w = widget();
        assert!(w.has::<Label>());
        assert!(!w.is_default::<Label>());
        assert_eq!(w.get::<Label>().unwrap(), Label("w".into()));

        w.set(Label("x".into()));
        assert_eq!(w.get::<Label>().unwrap(), Label("x".into()));
    }

    #[test]
    fn test_defaulted_slot_round_trip() {
        let mut w = widget();
        assert!(w.has::<Level>());
        assert!(w.is_default::<Level>());
        assert_eq!(w.get::<Level>().unwrap(), Level(3));

        w.set(Level(7));
        assert!(!w.is_default::<Level>());
        assert_eq!(w.get::<Level>().unwrap(), Level(7));

        w.unset::<Level>();
        assert!(w.is_default::<Level>());
        assert_eq!(w.get::<Level>().unwrap(), Level(3));
    }

    #[test]
    fn test_setting_default_value_explicitly_is_not_default() {
        let mut w = widget();
        w.set(Level(3));
        assert!(!w.is_default::<Level>());
    }

    #[test]
    fn test_optional_slot_reports_not_set() {
        let mut w = widget();
        assert!(!w.note.has());
        assert_eq!(
            w.note.get(),
            Err(AdmError::NotSet {
                parameter: "label"
            })
        );
        w.note.set(Label("n".into()));
        assert_eq!(w.note.value(), Some(&Label("n".into())));
        w.note.unset();
        assert!(!w.note.has());
    }

    #[test]
    fn test_vector_slot_deduplicates() {
        let mut w = widget();
        assert!(!w.has::<Vec<Level>>());
        assert!(w.add(Level(1)));
        assert!(w.add(Level(2)));
        assert!(!w.add(Level(1)));
        assert_eq!(w.get::<Vec<Level>>().unwrap(), vec![Level(1), Level(2)]);

        assert!(w.remove(&Level(1)));
        assert!(!w.remove(&Level(1)));
        assert_eq!(w.tags.as_slice(), &[Level(2)]);

        w.set(vec![Level(4), Level(4), Level(5)]);
        assert_eq!(w.get::<Vec<Level>>().unwrap(), vec![Level(4), Level(5)]);

        w.unset::<Vec<Level>>();
        assert!(!w.has::<Vec<Level>>());
    }
}
