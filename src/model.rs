use crate::{EditorError, statics};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use std::fmt;

/// Members the editor does not model, kept verbatim in document order.
pub type Extra = IndexMap<String, Value>;

/// The three typed slots a template can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubKind {
    Analog,
    Discrete,
    Breaker,
}

impl SubKind {
    pub const ALL: [SubKind; 3] = [SubKind::Analog, SubKind::Discrete, SubKind::Breaker];

    pub fn as_str(self) -> &'static str {
        match self {
            SubKind::Analog => statics::TPL_ANALOG,
            SubKind::Discrete => statics::TPL_DISCRETE,
            SubKind::Breaker => statics::TPL_BREAKER,
        }
    }

    pub fn parse(name: &str) -> Result<Self, EditorError> {
        SubKind::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| EditorError::UnknownKind(name.to_string()))
    }
}

impl fmt::Display for SubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain string attributes of a sub-definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubField {
    Name,
    ElementType,
    AreaOfResponsibilityId,
    ElementName,
    MeasurementType,
    UnitOfMeasure,
    WeightingSe,
    Multiplier,
    Phases,
    FlowBreakerFlag,
    VoltMagLimitCa,
    DmsFlag,
}

impl SubField {
    pub const ALL: [SubField; 12] = [
        SubField::Name,
        SubField::ElementType,
        SubField::AreaOfResponsibilityId,
        SubField::ElementName,
        SubField::MeasurementType,
        SubField::UnitOfMeasure,
        SubField::WeightingSe,
        SubField::Multiplier,
        SubField::Phases,
        SubField::FlowBreakerFlag,
        SubField::VoltMagLimitCa,
        SubField::DmsFlag,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            SubField::Name => statics::TPL_NAME,
            SubField::ElementType => statics::TPL_ELEMENT_TYPE,
            SubField::AreaOfResponsibilityId => statics::TPL_AREA_OF_RESPONSIBILITY_ID,
            SubField::ElementName => statics::TPL_ELEMENT_NAME,
            SubField::MeasurementType => statics::TPL_MEASUREMENT_TYPE,
            SubField::UnitOfMeasure => statics::TPL_UNIT_OF_MEASURE,
            SubField::WeightingSe => statics::TPL_WEIGHTING_SE,
            SubField::Multiplier => statics::TPL_MULTIPLIER,
            SubField::Phases => statics::TPL_PHASES,
            SubField::FlowBreakerFlag => statics::TPL_FLOW_BREAKER_FLAG,
            SubField::VoltMagLimitCa => statics::TPL_VOLT_MAG_LIMIT_CA,
            SubField::DmsFlag => statics::TPL_DMS_FLAG,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubField::Name => statics::EN_FIELD_DISPLAY_NAME,
            SubField::ElementType => statics::EN_FIELD_ELEMENT_TYPE,
            SubField::AreaOfResponsibilityId => statics::EN_FIELD_AOR,
            SubField::ElementName => statics::EN_FIELD_ELEMENT_NAME,
            SubField::MeasurementType => statics::EN_FIELD_MEASUREMENT_TYPE,
            SubField::UnitOfMeasure => statics::EN_FIELD_UNIT_OF_MEASURE,
            SubField::WeightingSe => statics::EN_FIELD_WEIGHTING_SE,
            SubField::Multiplier => statics::EN_FIELD_MULTIPLIER,
            SubField::Phases => statics::EN_FIELD_PHASES,
            SubField::FlowBreakerFlag => statics::EN_FIELD_FLOW_BREAKER_FLAG,
            SubField::VoltMagLimitCa => statics::EN_FIELD_VOLT_MAG_LIMIT_CA,
            SubField::DmsFlag => statics::EN_FIELD_DMS_FLAG,
        }
    }

    pub fn applies_to(self, kind: SubKind) -> bool {
        match self {
            SubField::Name | SubField::ElementType | SubField::AreaOfResponsibilityId => true,
            SubField::ElementName | SubField::MeasurementType => {
                matches!(kind, SubKind::Analog | SubKind::Discrete)
            }
            SubField::UnitOfMeasure
            | SubField::WeightingSe
            | SubField::Multiplier
            | SubField::Phases => kind == SubKind::Analog,
            SubField::FlowBreakerFlag | SubField::VoltMagLimitCa | SubField::DmsFlag => {
                kind == SubKind::Breaker
            }
        }
    }

    /// Fields of `kind`, in form order.
    pub fn for_kind(kind: SubKind) -> impl Iterator<Item = SubField> {
        SubField::ALL.into_iter().filter(move |f| f.applies_to(kind))
    }

    fn from_wire(name: &str, kind: SubKind) -> Option<Self> {
        Self::for_kind(kind).find(|f| f.wire_name() == name)
    }
}

/// Nested value objects hanging off a sub-definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointGroup {
    AnalogValue,
    AnalogInfo,
    DiscreteValue,
    DiscreteInfo,
}

impl PointGroup {
    pub const ALL: [PointGroup; 4] = [
        PointGroup::AnalogValue,
        PointGroup::AnalogInfo,
        PointGroup::DiscreteValue,
        PointGroup::DiscreteInfo,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            PointGroup::AnalogValue => statics::TPL_ANALOG_VALUE,
            PointGroup::AnalogInfo => statics::TPL_ANALOG_INFO,
            PointGroup::DiscreteValue => statics::TPL_DISCRETE_VALUE,
            PointGroup::DiscreteInfo => statics::TPL_DISCRETE_INFO,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointGroup::AnalogValue => statics::EN_GROUP_ANALOG_VALUE,
            PointGroup::AnalogInfo => statics::EN_GROUP_ANALOG_INFO,
            PointGroup::DiscreteValue => statics::EN_GROUP_DISCRETE_VALUE,
            PointGroup::DiscreteInfo => statics::EN_GROUP_DISCRETE_INFO,
        }
    }

    pub fn owner(self) -> SubKind {
        match self {
            PointGroup::AnalogValue | PointGroup::AnalogInfo => SubKind::Analog,
            PointGroup::DiscreteValue | PointGroup::DiscreteInfo => SubKind::Discrete,
        }
    }

    /// Fields that may be written through this group.
    pub fn fields(self) -> &'static [PointField] {
        match self {
            PointGroup::AnalogValue => {
                &[PointField::Name, PointField::Archive, PointField::InfoName]
            }
            PointGroup::AnalogInfo | PointGroup::DiscreteInfo => {
                &[PointField::Name, PointField::Value, PointField::InfoName]
            }
            PointGroup::DiscreteValue => &[PointField::Name, PointField::InfoName],
        }
    }

    pub fn for_kind(kind: SubKind) -> impl Iterator<Item = PointGroup> {
        PointGroup::ALL.into_iter().filter(move |g| g.owner() == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointField {
    Name,
    Archive,
    Value,
    InfoName,
}

impl PointField {
    pub const ALL: [PointField; 4] = [
        PointField::Name,
        PointField::Archive,
        PointField::Value,
        PointField::InfoName,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            PointField::Name => statics::TPL_NAME,
            PointField::Archive => statics::TPL_ARCHIVE,
            PointField::Value => statics::TPL_VALUE,
            PointField::InfoName => statics::TPL_INFO_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointField::Name => statics::EN_FIELD_NAME,
            PointField::Archive => statics::EN_FIELD_ARCHIVE,
            PointField::Value => statics::EN_FIELD_VALUE,
            PointField::InfoName => statics::EN_FIELD_INFO_NAME,
        }
    }
}

/// Address of one editable string inside a sub-definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Field(SubField),
    Point(PointGroup, PointField),
}

impl FieldPath {
    /// Resolve a field name (and optional nested name) against the closed vocabulary of `kind`.
    pub fn parse(kind: SubKind, field: &str, nested: Option<&str>) -> Result<Self, EditorError> {
        let unknown = || EditorError::UnknownField {
            kind,
            field: match nested {
                Some(n) => format!("{field}.{n}"),
                None => field.to_string(),
            },
        };

        let Some(nested) = nested else {
            return SubField::from_wire(field, kind)
                .map(FieldPath::Field)
                .ok_or_else(unknown);
        };

        let group = PointGroup::for_kind(kind)
            .find(|g| g.wire_name() == field)
            .ok_or_else(unknown)?;
        let point_field = group
            .fields()
            .iter()
            .copied()
            .find(|f| f.wire_name() == nested)
            .ok_or_else(unknown)?;
        Ok(FieldPath::Point(group, point_field))
    }

    /// Reject paths that do not belong to `kind`.
    pub fn check(self, kind: SubKind) -> Result<Self, EditorError> {
        let ok = match self {
            FieldPath::Field(f) => f.applies_to(kind),
            FieldPath::Point(g, f) => g.owner() == kind && g.fields().contains(&f),
        };
        if ok {
            Ok(self)
        } else {
            Err(EditorError::UnknownField {
                kind,
                field: self.to_string(),
            })
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Field(field) => f.write_str(field.wire_name()),
            FieldPath::Point(group, field) => {
                write!(f, "{}.{}", group.wire_name(), field.wire_name())
            }
        }
    }
}

/// `AnalogValue`, `AnalogInfo`, `DiscreteValue` and `DiscreteInfo` share this shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PointValue {
    pub name: Option<String>,
    pub archive: Option<String>,
    pub value: Option<String>,
    pub info_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PointValue {
    pub fn get(&self, field: PointField) -> Option<&str> {
        match field {
            PointField::Name => self.name.as_deref(),
            PointField::Archive => self.archive.as_deref(),
            PointField::Value => self.value.as_deref(),
            PointField::InfoName => self.info_name.as_deref(),
        }
    }

    pub fn field_mut(&mut self, field: PointField) -> &mut Option<String> {
        match field {
            PointField::Name => &mut self.name,
            PointField::Archive => &mut self.archive,
            PointField::Value => &mut self.value,
            PointField::InfoName => &mut self.info_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AnalogDef {
    pub name: Option<String>,
    pub element_type: Option<String>,
    pub area_of_responsibility_id: Option<String>,
    pub element_name: Option<String>,
    pub measurement_type: Option<String>,
    pub unit_of_measure: Option<String>,
    #[serde(rename = "WeightingSE")]
    pub weighting_se: Option<String>,
    pub multiplier: Option<String>,
    pub phases: Option<String>,
    pub analog_value: Option<PointValue>,
    pub analog_info: Option<PointValue>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DiscreteDef {
    pub name: Option<String>,
    pub element_type: Option<String>,
    pub area_of_responsibility_id: Option<String>,
    pub element_name: Option<String>,
    pub measurement_type: Option<String>,
    pub discrete_value: Option<PointValue>,
    pub discrete_info: Option<PointValue>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BreakerDef {
    pub name: Option<String>,
    pub element_type: Option<String>,
    pub area_of_responsibility_id: Option<String>,
    pub flow_breaker_flag: Option<String>,
    #[serde(rename = "VoltMagLimitCA")]
    pub volt_mag_limit_ca: Option<String>,
    #[serde(rename = "DMSFlag")]
    pub dms_flag: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Typed access to one slot of a template, whatever its kind.
pub trait SubDefinition {
    fn kind(&self) -> SubKind;

    /// `None` when `field` does not belong to this kind.
    fn text(&self, field: SubField) -> Option<&Option<String>>;

    fn text_mut(&mut self, field: SubField) -> Option<&mut Option<String>>;

    fn point(&self, _group: PointGroup) -> Option<&Option<PointValue>> {
        None
    }

    fn point_mut(&mut self, _group: PointGroup) -> Option<&mut Option<PointValue>> {
        None
    }

    fn extra(&self) -> &Extra;

    fn get(&self, path: FieldPath) -> Option<&str> {
        match path {
            FieldPath::Field(field) => self.text(field)?.as_deref(),
            FieldPath::Point(group, field) => self.point(group)?.as_ref()?.get(field),
        }
    }

    /// Slot for `path`, creating the nested object when the path points into one.
    fn entry_mut(&mut self, path: FieldPath) -> Option<&mut Option<String>> {
        match path {
            FieldPath::Field(field) => self.text_mut(field),
            FieldPath::Point(group, field) => {
                let point = self.point_mut(group)?.get_or_insert_with(PointValue::default);
                Some(point.field_mut(field))
            }
        }
    }
}

impl AnalogDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

impl SubDefinition for AnalogDef {
    fn kind(&self) -> SubKind {
        SubKind::Analog
    }

    fn text(&self, field: SubField) -> Option<&Option<String>> {
        match field {
            SubField::Name => Some(&self.name),
            SubField::ElementType => Some(&self.element_type),
            SubField::AreaOfResponsibilityId => Some(&self.area_of_responsibility_id),
            SubField::ElementName => Some(&self.element_name),
            SubField::MeasurementType => Some(&self.measurement_type),
            SubField::UnitOfMeasure => Some(&self.unit_of_measure),
            SubField::WeightingSe => Some(&self.weighting_se),
            SubField::Multiplier => Some(&self.multiplier),
            SubField::Phases => Some(&self.phases),
            SubField::FlowBreakerFlag | SubField::VoltMagLimitCa | SubField::DmsFlag => None,
        }
    }

    fn text_mut(&mut self, field: SubField) -> Option<&mut Option<String>> {
        match field {
            SubField::Name => Some(&mut self.name),
            SubField::ElementType => Some(&mut self.element_type),
            SubField::AreaOfResponsibilityId => Some(&mut self.area_of_responsibility_id),
            SubField::ElementName => Some(&mut self.element_name),
            SubField::MeasurementType => Some(&mut self.measurement_type),
            SubField::UnitOfMeasure => Some(&mut self.unit_of_measure),
            SubField::WeightingSe => Some(&mut self.weighting_se),
            SubField::Multiplier => Some(&mut self.multiplier),
            SubField::Phases => Some(&mut self.phases),
            SubField::FlowBreakerFlag | SubField::VoltMagLimitCa | SubField::DmsFlag => None,
        }
    }

    fn point(&self, group: PointGroup) -> Option<&Option<PointValue>> {
        match group {
            PointGroup::AnalogValue => Some(&self.analog_value),
            PointGroup::AnalogInfo => Some(&self.analog_info),
            PointGroup::DiscreteValue | PointGroup::DiscreteInfo => None,
        }
    }

    fn point_mut(&mut self, group: PointGroup) -> Option<&mut Option<PointValue>> {
        match group {
            PointGroup::AnalogValue => Some(&mut self.analog_value),
            PointGroup::AnalogInfo => Some(&mut self.analog_info),
            PointGroup::DiscreteValue | PointGroup::DiscreteInfo => None,
        }
    }

    fn extra(&self) -> &Extra {
        &self.extra
    }
}

impl DiscreteDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

impl SubDefinition for DiscreteDef {
    fn kind(&self) -> SubKind {
        SubKind::Discrete
    }

    fn text(&self, field: SubField) -> Option<&Option<String>> {
        match field {
            SubField::Name => Some(&self.name),
            SubField::ElementType => Some(&self.element_type),
            SubField::AreaOfResponsibilityId => Some(&self.area_of_responsibility_id),
            SubField::ElementName => Some(&self.element_name),
            SubField::MeasurementType => Some(&self.measurement_type),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: SubField) -> Option<&mut Option<String>> {
        match field {
            SubField::Name => Some(&mut self.name),
            SubField::ElementType => Some(&mut self.element_type),
            SubField::AreaOfResponsibilityId => Some(&mut self.area_of_responsibility_id),
            SubField::ElementName => Some(&mut self.element_name),
            SubField::MeasurementType => Some(&mut self.measurement_type),
            _ => None,
        }
    }

    fn point(&self, group: PointGroup) -> Option<&Option<PointValue>> {
        match group {
            PointGroup::DiscreteValue => Some(&self.discrete_value),
            PointGroup::DiscreteInfo => Some(&self.discrete_info),
            PointGroup::AnalogValue | PointGroup::AnalogInfo => None,
        }
    }

    fn point_mut(&mut self, group: PointGroup) -> Option<&mut Option<PointValue>> {
        match group {
            PointGroup::DiscreteValue => Some(&mut self.discrete_value),
            PointGroup::DiscreteInfo => Some(&mut self.discrete_info),
            PointGroup::AnalogValue | PointGroup::AnalogInfo => None,
        }
    }

    fn extra(&self) -> &Extra {
        &self.extra
    }
}

impl BreakerDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

impl SubDefinition for BreakerDef {
    fn kind(&self) -> SubKind {
        SubKind::Breaker
    }

    fn text(&self, field: SubField) -> Option<&Option<String>> {
        match field {
            SubField::Name => Some(&self.name),
            SubField::ElementType => Some(&self.element_type),
            SubField::AreaOfResponsibilityId => Some(&self.area_of_responsibility_id),
            SubField::FlowBreakerFlag => Some(&self.flow_breaker_flag),
            SubField::VoltMagLimitCa => Some(&self.volt_mag_limit_ca),
            SubField::DmsFlag => Some(&self.dms_flag),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: SubField) -> Option<&mut Option<String>> {
        match field {
            SubField::Name => Some(&mut self.name),
            SubField::ElementType => Some(&mut self.element_type),
            SubField::AreaOfResponsibilityId => Some(&mut self.area_of_responsibility_id),
            SubField::FlowBreakerFlag => Some(&mut self.flow_breaker_flag),
            SubField::VoltMagLimitCa => Some(&mut self.volt_mag_limit_ca),
            SubField::DmsFlag => Some(&mut self.dms_flag),
            _ => None,
        }
    }

    fn extra(&self) -> &Extra {
        &self.extra
    }
}

/// One template: up to three active slots plus any unmodelled members.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TemplateRecord {
    pub analog: Option<AnalogDef>,
    pub discrete: Option<DiscreteDef>,
    pub breaker: Option<BreakerDef>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TemplateRecord {
    /// A record with a single active slot named `name`.
    pub fn with_slot(kind: SubKind, name: &str) -> Self {
        let mut record = Self::default();
        record.activate(kind, name);
        record
    }

    pub fn is_active(&self, kind: SubKind) -> bool {
        match kind {
            SubKind::Analog => self.analog.is_some(),
            SubKind::Discrete => self.discrete.is_some(),
            SubKind::Breaker => self.breaker.is_some(),
        }
    }

    pub fn active_kinds(&self) -> Vec<SubKind> {
        SubKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }

    /// A reserved name with nothing configured yet.
    pub fn is_inactive(&self) -> bool {
        self.active_kinds().is_empty()
    }

    pub fn slot(&self, kind: SubKind) -> Option<&dyn SubDefinition> {
        match kind {
            SubKind::Analog => self.analog.as_ref().map(|d| d as &dyn SubDefinition),
            SubKind::Discrete => self.discrete.as_ref().map(|d| d as &dyn SubDefinition),
            SubKind::Breaker => self.breaker.as_ref().map(|d| d as &dyn SubDefinition),
        }
    }

    pub fn slot_mut(&mut self, kind: SubKind) -> Option<&mut dyn SubDefinition> {
        match kind {
            SubKind::Analog => self.analog.as_mut().map(|d| d as &mut dyn SubDefinition),
            SubKind::Discrete => self.discrete.as_mut().map(|d| d as &mut dyn SubDefinition),
            SubKind::Breaker => self.breaker.as_mut().map(|d| d as &mut dyn SubDefinition),
        }
    }

    /// Insert a minimal slot named `name`. An already active slot is left untouched.
    pub fn activate(&mut self, kind: SubKind, name: &str) {
        match kind {
            SubKind::Analog => {
                self.analog.get_or_insert_with(|| AnalogDef::named(name));
            }
            SubKind::Discrete => {
                self.discrete.get_or_insert_with(|| DiscreteDef::named(name));
            }
            SubKind::Breaker => {
                self.breaker.get_or_insert_with(|| BreakerDef::named(name));
            }
        }
    }

    /// Remove the slot entirely, fields included.
    pub fn deactivate(&mut self, kind: SubKind) {
        match kind {
            SubKind::Analog => self.analog = None,
            SubKind::Discrete => self.discrete = None,
            SubKind::Breaker => self.breaker = None,
        }
    }

    pub fn value(&self, kind: SubKind, path: FieldPath) -> Option<&str> {
        self.slot(kind)?.get(path)
    }
}

/// The whole template library: key -> record, in the order of the source text.
///
/// Equality ignores order, so a document compares equal to any reordering of itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateDocument {
    templates: IndexMap<String, TemplateRecord>,
}

impl TemplateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TemplateRecord> {
        self.templates.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TemplateRecord> {
        self.templates.get_mut(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateRecord)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert or replace; a replaced key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        record: TemplateRecord,
    ) -> Option<TemplateRecord> {
        self.templates.insert(key.into(), record)
    }

    pub fn remove(&mut self, key: &str) -> Option<TemplateRecord> {
        self.templates.shift_remove(key)
    }

    /// Move the record under `from` to `to`, keeping its position.
    /// Returns false if `from` is absent.
    pub(crate) fn rekey(&mut self, from: &str, to: &str) -> bool {
        let Some((index, _, record)) = self.templates.shift_remove_full(from) else {
            return false;
        };
        self.templates.shift_insert(index, to.to_string(), record);
        true
    }
}

impl FromIterator<(String, TemplateRecord)> for TemplateDocument {
    fn from_iter<I: IntoIterator<Item = (String, TemplateRecord)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TemplateDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> de::Visitor<'de> for DocumentVisitor {
            type Value = TemplateDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping template names to definitions")
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut templates = IndexMap::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key.is_empty() {
                        return Err(de::Error::custom("template key must not be empty"));
                    }
                    if templates.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate template key '{key}'")));
                    }
                    let record = map.next_value::<TemplateRecord>()?;
                    templates.insert(key, record);
                }
                Ok(TemplateDocument { templates })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

fn shadows(extra: &Extra, reserved: impl IntoIterator<Item = &'static str>) -> bool {
    reserved.into_iter().any(|name| extra.contains_key(name))
}

fn point_is_valid(point: Option<&PointValue>) -> bool {
    point.is_none_or(|p| !shadows(&p.extra, PointField::ALL.map(PointField::wire_name)))
}

fn slot_is_valid(slot: &dyn SubDefinition) -> bool {
    let kind = slot.kind();
    let reserved = SubField::for_kind(kind)
        .map(SubField::wire_name)
        .chain(PointGroup::for_kind(kind).map(PointGroup::wire_name));
    !shadows(slot.extra(), reserved)
        && PointGroup::for_kind(kind)
            .all(|g| point_is_valid(slot.point(g).and_then(Option::as_ref)))
}

/// Keys are non-empty and no unmodelled member shadows a typed one.
///
/// Every document produced by `codec::parse` satisfies this.
pub fn is_valid_document(doc: &TemplateDocument) -> bool {
    doc.iter().all(|(key, record)| {
        !key.is_empty()
            && !shadows(&record.extra, SubKind::ALL.map(SubKind::as_str))
            && SubKind::ALL
                .into_iter()
                .filter_map(|k| record.slot(k))
                .all(slot_is_valid)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_parse_accepts_fields_of_the_kind() {
        assert_eq!(
            FieldPath::parse(SubKind::Analog, "UnitOfMeasure", None).unwrap(),
            FieldPath::Field(SubField::UnitOfMeasure)
        );
        assert_eq!(
            FieldPath::parse(SubKind::Analog, "AnalogValue", Some("Archive")).unwrap(),
            FieldPath::Point(PointGroup::AnalogValue, PointField::Archive)
        );
        assert_eq!(
            FieldPath::parse(SubKind::Breaker, "DMSFlag", None).unwrap(),
            FieldPath::Field(SubField::DmsFlag)
        );
    }

    #[test]
    fn field_path_parse_rejects_foreign_fields() {
        let err = FieldPath::parse(SubKind::Discrete, "UnitOfMeasure", None).unwrap_err();
        assert_eq!(
            err,
            EditorError::UnknownField {
                kind: SubKind::Discrete,
                field: "UnitOfMeasure".to_string()
            }
        );

        // DiscreteValue has no Archive.
        assert!(FieldPath::parse(SubKind::Discrete, "DiscreteValue", Some("Archive")).is_err());
        // Nested group owned by another kind.
        assert!(FieldPath::parse(SubKind::Breaker, "AnalogValue", Some("InfoName")).is_err());
        // Case matters.
        assert!(FieldPath::parse(SubKind::Analog, "name", None).is_err());
    }

    #[test]
    fn check_matches_parse() {
        for kind in SubKind::ALL {
            for field in SubField::ALL {
                let parsed = FieldPath::parse(kind, field.wire_name(), None).is_ok();
                assert_eq!(parsed, FieldPath::Field(field).check(kind).is_ok());
            }
        }
    }

    #[test]
    fn sub_kind_parse_round_trips_names() {
        for kind in SubKind::ALL {
            assert_eq!(SubKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            SubKind::parse("IfsPoint").unwrap_err(),
            EditorError::UnknownKind("IfsPoint".to_string())
        );
    }

    #[test]
    fn entry_mut_creates_nested_object_lazily() {
        let mut analog = AnalogDef::named("PT_KV");
        assert!(analog.analog_value.is_none());

        let path = FieldPath::Point(PointGroup::AnalogValue, PointField::InfoName);
        *analog.entry_mut(path).unwrap() = Some("INFO".to_string());

        assert_eq!(analog.get(path), Some("INFO"));
        assert_eq!(
            analog.analog_value.as_ref().and_then(|v| v.archive.as_deref()),
            None
        );
    }

    #[test]
    fn activate_keeps_existing_slot() {
        let mut record = TemplateRecord::with_slot(SubKind::Analog, "A");
        record.analog.as_mut().unwrap().unit_of_measure = Some("kV".to_string());
        record.activate(SubKind::Analog, "B");

        let analog = record.analog.as_ref().unwrap();
        assert_eq!(analog.name.as_deref(), Some("A"));
        assert_eq!(analog.unit_of_measure.as_deref(), Some("kV"));
    }

    #[test]
    fn rekey_keeps_position() {
        let mut doc: TemplateDocument = ["A", "B", "C"]
            .into_iter()
            .map(|k| (k.to_string(), TemplateRecord::default()))
            .collect();
        assert!(doc.rekey("B", "Z"));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["A", "Z", "C"]);
        assert!(!doc.rekey("missing", "Y"));
    }

    #[test]
    fn validity_rejects_empty_keys_and_shadowing_extras() {
        let mut doc = TemplateDocument::new();
        doc.insert("OK", TemplateRecord::with_slot(SubKind::Analog, "OK"));
        assert!(is_valid_document(&doc));

        let mut shadowed = TemplateRecord::with_slot(SubKind::Analog, "X");
        shadowed
            .analog
            .as_mut()
            .unwrap()
            .extra
            .insert("Name".to_string(), Value::String("dup".to_string()));
        doc.insert("X", shadowed);
        assert!(!is_valid_document(&doc));

        let mut empty_key = TemplateDocument::new();
        empty_key.insert("", TemplateRecord::default());
        assert!(!is_valid_document(&empty_key));
    }
}
