//! Variant resolution.
//!
//! A [`Variants`] value holds one component's static styling table: a base
//! class, ordered variant axes mapping values to class fragments, per-axis
//! defaults, and compound rules that add a fragment when a combination of
//! values holds. It is immutable once built and can be shared across threads.

use crate::class_list::{ClassInput, ClassList};
use crate::errors::{Result, VariantError};
use crate::props::{AxisKind, AxisValue, Props};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

/// One variant axis: its value kind and the fragment for each declared value.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    kind: Option<AxisKind>,
    values: IndexMap<AxisValue, String>,
}

impl Axis {
    /// The shared kind of the axis values, `None` for an axis with no values.
    pub fn kind(&self) -> Option<AxisKind> {
        self.kind
    }

    pub fn values(&self) -> impl Iterator<Item = &AxisValue> {
        self.values.keys()
    }

    pub fn fragment(&self, value: &AxisValue) -> Option<&str> {
        self.values.get(value).map(String::as_str)
    }

    /// Read a string value as the axis kind, so `"2"` selects `2` on an int axis.
    fn coerce(&self, value: AxisValue) -> AxisValue {
        match self.kind {
            Some(kind) => value.coerce(kind),
            None => value,
        }
    }

    /// Whether an explicit props value belongs to this axis' domain.
    fn accepts(&self, value: &AxisValue) -> bool {
        self.kind == Some(value.kind()) && self.values.contains_key(value)
    }
}

/// A rule adding `fragment` when every constraint holds on the effective values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundVariant {
    constraints: IndexMap<String, AxisValue>,
    fragment: String,
}

impl CompoundVariant {
    pub fn constraints(&self) -> &IndexMap<String, AxisValue> {
        &self.constraints
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    fn matches(&self, selection: &Selection<'_>) -> bool {
        !self.constraints.is_empty()
            && self
                .constraints
                .iter()
                .all(|(axis, expected)| selection.value(axis) == Some(expected))
    }
}

/// Where an effective axis value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Props,
    Default,
}

/// The effective value of one axis after default filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedValue {
    pub value: AxisValue,
    pub source: ValueSource,
}

/// Detailed outcome of one resolution, as reported by [`Variants::explain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Final class string; identical to what [`Variants::resolve`] returns.
    pub classes: String,
    /// True when the props were the "no selection" sentinel.
    pub no_selection: bool,
    /// Effective value per axis, in declaration order.
    pub axes: IndexMap<String, SelectedValue>,
    /// Indices of the compound rules that matched.
    pub compounds: Vec<usize>,
}

/// Effective per-axis values for one call.
struct Selection<'a> {
    values: IndexMap<&'a str, Cow<'a, AxisValue>>,
}

impl Selection<'_> {
    fn value(&self, axis: &str) -> Option<&AxisValue> {
        self.values.get(axis).map(|value| value.as_ref())
    }
}

/// Immutable variant table for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct Variants {
    base: String,
    axes: IndexMap<String, Axis>,
    defaults: IndexMap<String, AxisValue>,
    compounds: Vec<CompoundVariant>,
}

impl Variants {
    /// Start building a variant table on top of `base`.
    pub fn builder(base: impl Into<ClassInput>) -> VariantsBuilder {
        VariantsBuilder::new(base)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn axes(&self) -> &IndexMap<String, Axis> {
        &self.axes
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.get(name)
    }

    pub fn default_value(&self, axis: &str) -> Option<&AxisValue> {
        self.defaults.get(axis)
    }

    pub fn compound_variants(&self) -> &[CompoundVariant] {
        &self.compounds
    }

    /// Resolve `props` into a single class string.
    ///
    /// The "no selection" sentinel yields the base class alone. Otherwise
    /// each axis contributes the fragment of its effective value (the props
    /// value if it belongs to the axis, else the default), followed by the
    /// fragments of every compound rule whose constraints all hold.
    pub fn resolve<P: Props + ?Sized>(&self, props: &P) -> String {
        if props.is_absent() {
            return self.base.clone();
        }

        let selection = self.select(props);
        let (classes, _) = self.compose(&selection);
        classes.join()
    }

    /// Same as [`resolve`](Self::resolve), but also reports the effective
    /// axis values and which compound rules matched.
    pub fn explain<P: Props + ?Sized>(&self, props: &P) -> Resolution {
        if props.is_absent() {
            return Resolution {
                classes: self.base.clone(),
                no_selection: true,
                axes: IndexMap::new(),
                compounds: Vec::new(),
            };
        }

        let selection = self.select(props);
        let (classes, compounds) = self.compose(&selection);
        let axes = selection
            .values
            .iter()
            .map(|(axis, value)| {
                let source = match value {
                    Cow::Owned(_) => ValueSource::Props,
                    Cow::Borrowed(_) => ValueSource::Default,
                };
                let selected = SelectedValue {
                    value: value.as_ref().clone(),
                    source,
                };
                (axis.to_string(), selected)
            })
            .collect();

        Resolution {
            classes: classes.join(),
            no_selection: false,
            axes,
            compounds,
        }
    }

    /// Turn the table into a plain resolve function.
    pub fn into_fn(self) -> impl Fn(&dyn Props) -> String + Send + Sync {
        move |props: &dyn Props| self.resolve(props)
    }

    fn select<'a, P: Props + ?Sized>(&'a self, props: &P) -> Selection<'a> {
        let mut values = IndexMap::with_capacity(self.axes.len());

        for (name, axis) in &self.axes {
            let explicit = props
                .get(name)
                .map(|value| axis.coerce(value))
                .filter(|value| axis.accepts(value));
            let effective = match explicit {
                Some(value) => Some(Cow::Owned(value)),
                None => self.defaults.get(name).map(Cow::Borrowed),
            };
            if let Some(value) = effective {
                values.insert(name.as_str(), value);
            }
        }

        Selection { values }
    }

    fn compose(&self, selection: &Selection<'_>) -> (ClassList, Vec<usize>) {
        let mut classes = ClassList::new();
        classes.push(&self.base);

        for (name, axis) in &self.axes {
            if let Some(fragment) = selection.value(name).and_then(|value| axis.fragment(value)) {
                classes.push(fragment);
            }
        }

        let mut matched = Vec::new();
        for (index, compound) in self.compounds.iter().enumerate() {
            if compound.matches(selection) {
                classes.push(&compound.fragment);
                matched.push(index);
            }
        }

        tracing::trace!(
            axes = selection.values.len(),
            compounds = matched.len(),
            "resolved variant classes"
        );

        (classes, matched)
    }
}

/// Builder for [`Variants`]; all configuration checks run in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct VariantsBuilder {
    base: ClassInput,
    axes: Vec<(String, Vec<(AxisValue, ClassInput)>)>,
    defaults: Vec<(String, AxisValue)>,
    compounds: Vec<(Vec<(String, AxisValue)>, ClassInput)>,
}

impl VariantsBuilder {
    pub fn new(base: impl Into<ClassInput>) -> Self {
        Self {
            base: base.into(),
            axes: Vec::new(),
            defaults: Vec::new(),
            compounds: Vec::new(),
        }
    }

    /// Declare an axis and the fragment for each of its values.
    pub fn variant<A, I, V, C>(mut self, axis: A, values: I) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = (V, C)>,
        V: Into<AxisValue>,
        C: Into<ClassInput>,
    {
        let values = values
            .into_iter()
            .map(|(value, fragment)| (value.into(), fragment.into()))
            .collect();
        self.axes.push((axis.into(), values));
        self
    }

    /// Set the value used for `axis` when props do not supply a valid one.
    pub fn default_value(mut self, axis: impl Into<String>, value: impl Into<AxisValue>) -> Self {
        self.defaults.push((axis.into(), value.into()));
        self
    }

    /// Add a compound rule.
    pub fn compound<I, K, V>(mut self, constraints: I, fragment: impl Into<ClassInput>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AxisValue>,
    {
        let constraints = constraints
            .into_iter()
            .map(|(axis, value)| (axis.into(), value.into()))
            .collect();
        self.compounds.push((constraints, fragment.into()));
        self
    }

    /// Validate the configuration and freeze it.
    ///
    /// Rejects duplicate axes, axes whose values mix kinds, defaults and
    /// compound constraints of the wrong kind, and compound rules with no
    /// constraints. Defaults for unknown axes are ignored; compound rules
    /// naming unknown axes are kept but can never match.
    pub fn build(self) -> Result<Variants> {
        let mut axes: IndexMap<String, Axis> = IndexMap::with_capacity(self.axes.len());
        for (name, values) in self.axes {
            if axes.contains_key(&name) {
                return Err(VariantError::DuplicateAxis(name));
            }

            let mut kind = None;
            let mut fragments = IndexMap::with_capacity(values.len());
            for (value, fragment) in values {
                match kind {
                    None => kind = Some(value.kind()),
                    Some(k) if k != value.kind() => {
                        return Err(VariantError::MixedAxisDomain { axis: name });
                    }
                    Some(_) => {}
                }
                fragments.insert(value, crate::class_list::join(&fragment));
            }

            axes.insert(
                name,
                Axis {
                    kind,
                    values: fragments,
                },
            );
        }

        let mut defaults = IndexMap::with_capacity(self.defaults.len());
        for (name, value) in self.defaults {
            let Some(axis) = axes.get(&name) else {
                tracing::warn!(axis = %name, "ignoring default value for unknown axis");
                continue;
            };
            let value = axis.coerce(value);
            if axis.kind.is_some_and(|kind| kind != value.kind()) {
                return Err(VariantError::DefaultKindMismatch { axis: name });
            }
            defaults.insert(name, value);
        }

        let mut compounds = Vec::with_capacity(self.compounds.len());
        for (index, (constraints, fragment)) in self.compounds.into_iter().enumerate() {
            if constraints.is_empty() {
                return Err(VariantError::EmptyCompound { index });
            }

            let mut checked = IndexMap::with_capacity(constraints.len());
            for (name, value) in constraints {
                let value = match axes.get(&name) {
                    None => {
                        tracing::warn!(
                            axis = %name,
                            index,
                            "compound variant names an unknown axis and will never match"
                        );
                        value
                    }
                    Some(axis) => {
                        let value = axis.coerce(value);
                        if axis.kind.is_some_and(|kind| kind != value.kind()) {
                            return Err(VariantError::ConstraintKindMismatch { index, axis: name });
                        }
                        value
                    }
                };
                checked.insert(name, value);
            }

            compounds.push(CompoundVariant {
                constraints: checked,
                fragment: crate::class_list::join(&fragment),
            });
        }

        tracing::debug!(
            axes = axes.len(),
            defaults = defaults.len(),
            compounds = compounds.len(),
            "built variant table"
        );

        Ok(Variants {
            base: crate::class_list::join(&self.base),
            axes,
            defaults,
            compounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sized() -> Variants {
        Variants::builder("chip")
            .variant("size", [("sm", "text-sm"), ("lg", "text-lg")])
            .variant("level", [(1, "z-10"), (2, "z-20")])
            .default_value("size", "sm")
            .build()
            .unwrap()
    }

    #[test]
    fn test_unknown_value_falls_back_to_default() {
        let variants = sized();
        assert_eq!(variants.resolve(&[("size", "xl")]), "chip text-sm");
    }

    #[test]
    fn test_kind_mismatch_falls_back_to_default() {
        let variants = sized();
        let props = [("size", AxisValue::Bool(true)), ("level", AxisValue::from("two"))];
        assert_eq!(variants.resolve(&props), "chip text-sm");
    }

    #[test]
    fn test_string_values_read_as_axis_kind() {
        let variants = Variants::builder("grid")
            .variant("cols", [(1, "grid-cols-1"), (2, "grid-cols-2")])
            .variant("gap", [(true, "gap-4"), (false, "gap-0")])
            .default_value("cols", "2")
            .default_value("gap", "false")
            .compound([("cols", "1"), ("gap", "true")], "p-2")
            .build()
            .unwrap();

        assert_eq!(variants.default_value("cols"), Some(&AxisValue::Int(2)));
        assert_eq!(variants.resolve(&[("cols", "x")]), "grid grid-cols-2 gap-0");
        assert_eq!(
            variants.resolve(&serde_json::json!({"cols": "1", "gap": "true"})),
            "grid grid-cols-1 gap-4 p-2"
        );
    }

    #[test]
    fn test_axis_without_default_contributes_nothing() {
        let variants = sized();
        let props: HashMap<&str, AxisValue> = HashMap::new();
        assert_eq!(variants.resolve(&props), "chip text-sm");

        let props = [("level", 2)];
        assert_eq!(variants.resolve(&props), "chip text-sm z-20");
    }

    #[test]
    fn test_fragments_are_normalized_at_build() {
        let variants = Variants::builder("  card  ")
            .variant("tone", [("muted", vec!["  text-gray-500", "", "bg-gray-50 "])])
            .build()
            .unwrap();

        assert_eq!(variants.base(), "card");
        assert_eq!(
            variants.axis("tone").unwrap().fragment(&"muted".into()),
            Some("text-gray-500 bg-gray-50")
        );
        assert_eq!(variants.resolve(&[("tone", "muted")]), "card text-gray-500 bg-gray-50");
    }

    #[test]
    fn test_empty_compound_rejected() {
        let empty: [(&str, AxisValue); 0] = [];
        let err = Variants::builder("x")
            .variant("size", [("sm", "a")])
            .compound(empty, "always")
            .build()
            .unwrap_err();
        assert!(matches!(err, VariantError::EmptyCompound { index: 0 }));
    }

    #[test]
    fn test_duplicate_axis_rejected() {
        let err = Variants::builder("x")
            .variant("size", [("sm", "a")])
            .variant("size", [("lg", "b")])
            .build()
            .unwrap_err();
        assert!(matches!(err, VariantError::DuplicateAxis(ref axis) if axis == "size"));
    }

    #[test]
    fn test_mixed_axis_domain_rejected() {
        let err = Variants::builder("x")
            .variant("size", [(AxisValue::from("sm"), "a"), (AxisValue::Int(2), "b")])
            .build()
            .unwrap_err();
        assert!(matches!(err, VariantError::MixedAxisDomain { .. }));
    }

    #[test]
    fn test_default_kind_mismatch_rejected() {
        let err = Variants::builder("x")
            .variant("disabled", [(true, "a"), (false, "b")])
            .default_value("disabled", "no")
            .build()
            .unwrap_err();
        assert!(matches!(err, VariantError::DefaultKindMismatch { .. }));
    }

    #[test]
    fn test_constraint_kind_mismatch_rejected() {
        let err = Variants::builder("x")
            .variant("disabled", [(true, "a"), (false, "b")])
            .compound([("disabled", "yes")], "c")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            VariantError::ConstraintKindMismatch { index: 0, ref axis } if axis == "disabled"
        ));
    }

    #[test]
    fn test_default_for_unknown_axis_ignored() {
        let variants = Variants::builder("x")
            .variant("size", [("sm", "a")])
            .default_value("color", "red")
            .build()
            .unwrap();
        assert_eq!(variants.default_value("color"), None);
        assert_eq!(variants.resolve(&[("size", "sm")]), "x a");
    }

    #[test]
    fn test_compound_on_unknown_axis_never_matches() {
        let variants = Variants::builder("x")
            .variant("size", [("sm", "a")])
            .default_value("size", "sm")
            .compound([("size", "sm"), ("color", "red")], "never")
            .build()
            .unwrap();
        assert_eq!(variants.resolve(&[("size", "sm"), ("color", "red")]), "x a");
    }

    #[test]
    fn test_explain_reports_sources_and_matches() {
        let variants = Variants::builder("btn")
            .variant("intent", [("primary", "p"), ("secondary", "s")])
            .variant("disabled", [(true, "d"), (false, "e")])
            .default_value("intent", "primary")
            .default_value("disabled", false)
            .compound([("intent", AxisValue::from("primary")), ("disabled", false.into())], "pe")
            .compound([("intent", "secondary")], "never")
            .build()
            .unwrap();

        let resolution = variants.explain(&[("disabled", false)]);
        assert_eq!(resolution.classes, "btn p e pe");
        assert!(!resolution.no_selection);
        assert_eq!(resolution.compounds, vec![0]);
        assert_eq!(resolution.axes["intent"].source, ValueSource::Default);
        assert_eq!(resolution.axes["disabled"].source, ValueSource::Props);
        assert_eq!(resolution.axes["disabled"].value, AxisValue::Bool(false));

        let none = variants.explain(&());
        assert_eq!(none.classes, "btn");
        assert!(none.no_selection);
        assert!(none.axes.is_empty());
    }

    #[test]
    fn test_into_fn() {
        let resolve = sized().into_fn();
        let props = serde_json::json!({"size": "lg", "level": 1});
        assert_eq!(resolve(&props), "chip text-lg z-10");
        assert_eq!(resolve(&serde_json::Value::Null), "chip");
    }
}
