// Central place for UI strings, template member names and backend endpoints.
// Keep these out of gui.rs and model.rs so a renamed member only changes here.

// Backend defaults and endpoints (relative to the API base URL).
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const API_TEMPLATES_RAW: &str = "templates/raw";
pub const API_TEMPLATES_STATS: &str = "templates";

// Clone target for key K is K + COPY_SUFFIX.
pub const COPY_SUFFIX: &str = "_COPY";

// Template document member names (TPL_ prefix). These must match the serde renames in model.rs.
pub const TPL_ANALOG: &str = "Analog";
pub const TPL_DISCRETE: &str = "Discrete";
pub const TPL_BREAKER: &str = "Breaker";

pub const TPL_NAME: &str = "Name";
pub const TPL_ELEMENT_TYPE: &str = "ElementType";
pub const TPL_AREA_OF_RESPONSIBILITY_ID: &str = "AreaOfResponsibilityId";
pub const TPL_ELEMENT_NAME: &str = "ElementName";
pub const TPL_MEASUREMENT_TYPE: &str = "MeasurementType";
pub const TPL_UNIT_OF_MEASURE: &str = "UnitOfMeasure";
pub const TPL_WEIGHTING_SE: &str = "WeightingSE";
pub const TPL_MULTIPLIER: &str = "Multiplier";
pub const TPL_PHASES: &str = "Phases";
pub const TPL_FLOW_BREAKER_FLAG: &str = "FlowBreakerFlag";
pub const TPL_VOLT_MAG_LIMIT_CA: &str = "VoltMagLimitCA";
pub const TPL_DMS_FLAG: &str = "DMSFlag";

pub const TPL_ANALOG_VALUE: &str = "AnalogValue";
pub const TPL_ANALOG_INFO: &str = "AnalogInfo";
pub const TPL_DISCRETE_VALUE: &str = "DiscreteValue";
pub const TPL_DISCRETE_INFO: &str = "DiscreteInfo";

pub const TPL_ARCHIVE: &str = "Archive";
pub const TPL_VALUE: &str = "Value";
pub const TPL_INFO_NAME: &str = "InfoName";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "SCADA Template Console";

pub const EN_NAV_DASHBOARD: &str = "Dashboard";
pub const EN_NAV_TEMPLATES: &str = "XML Templates";

pub const EN_BADGE_CONNECTED: &str = "Connected";
pub const EN_BADGE_DISCONNECTED: &str = "Disconnected";
pub const EN_BADGE_ACTIVE: &str = "Active Element";
pub const EN_BADGE_INACTIVE: &str = "No definitions";
pub const EN_BADGE_DIRTY: &str = "unsaved changes";
pub const EN_BADGE_UNPARSABLE: &str = "Text does not parse; form editing disabled";

pub const EN_HEADING_OVERVIEW: &str = "System Overview";
pub const EN_HEADING_HEALTH: &str = "Configuration Health";
pub const EN_HEADING_TEMPLATES: &str = "XML Signal Templates";
pub const EN_HEADING_ELEMENTS: &str = "ELEMENTS";
pub const EN_HEADING_SNIPPET: &str = "LOCAL JSON SNIPPET";

pub const EN_STAT_TOTAL: &str = "Total Templates";
pub const EN_STAT_ANALOG: &str = "Analog Definitions";
pub const EN_STAT_DISCRETE: &str = "Discrete Definitions";
pub const EN_STAT_BREAKER: &str = "Breaker Definitions";
pub const EN_HEALTH_OK: &str = "All templates passed validation.";

pub const EN_BTN_REFRESH: &str = "Update Data";
pub const EN_BTN_RELOAD: &str = "Reload";
pub const EN_BTN_DEPLOY: &str = "Deploy Changes";
pub const EN_BTN_DEPLOYING: &str = "Deploying...";
pub const EN_BTN_ADD: &str = "+ Add";
pub const EN_BTN_CLONE: &str = "Clone";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_RENAME: &str = "Rename";
pub const EN_BTN_UNDO: &str = "Undo";
pub const EN_BTN_REDO: &str = "Redo";
pub const EN_BTN_IMPORT: &str = "Import...";
pub const EN_BTN_EXPORT: &str = "Export...";
pub const EN_BTN_CONFIRM: &str = "Confirm";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_MODE_FORM: &str = "Form";
pub const EN_MODE_RAW: &str = "Raw JSON";

pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "Search templates...";
pub const EN_HINT_NEW_KEY: &str = "New element key (e.g. PT_KV)";
pub const EN_LABEL_CONFIGURATION: &str = "Configuration";

pub const EN_EMPTY_STATE_HEADING: &str = "No element selected";
pub const EN_EMPTY_STATE_HINT: &str =
    "Pick a template from the element list to edit its properties or add a new one.";
pub const EN_LOADING: &str = "Loading templates...";

pub const EN_WINDOW_CONFIRM: &str = "Confirm";
pub const EN_CONFIRM_DELETE: &str = "Delete this template?";
pub const EN_CONFIRM_OVERWRITE_CLONE: &str = "A clone with this name already exists. Overwrite it?";
pub const EN_CONFIRM_DISCARD: &str = "Discard unsaved changes and reload from the backend?";

pub const EN_SAVED_OK: &str = "Templates saved successfully";
pub const EN_ERR_SAVE_FORMAT: &str = "Error saving templates. Check JSON format.";
pub const EN_ERR_RELOAD: &str = "Reload skipped while a deploy is pending.";

// Field labels shown in the form view.
pub const EN_FIELD_DISPLAY_NAME: &str = "Display Name";
pub const EN_FIELD_ELEMENT_TYPE: &str = "Element Type";
pub const EN_FIELD_AOR: &str = "Area of Responsibility";
pub const EN_FIELD_ELEMENT_NAME: &str = "Element Name";
pub const EN_FIELD_MEASUREMENT_TYPE: &str = "Measurement Type";
pub const EN_FIELD_UNIT_OF_MEASURE: &str = "Unit of Measure";
pub const EN_FIELD_WEIGHTING_SE: &str = "Weighting SE";
pub const EN_FIELD_MULTIPLIER: &str = "Multiplier";
pub const EN_FIELD_PHASES: &str = "Phases";
pub const EN_FIELD_FLOW_BREAKER_FLAG: &str = "Flow Breaker Flag";
pub const EN_FIELD_VOLT_MAG_LIMIT_CA: &str = "Volt Mag Limit CA";
pub const EN_FIELD_DMS_FLAG: &str = "DMS Flag";
pub const EN_FIELD_NAME: &str = "Name";
pub const EN_FIELD_ARCHIVE: &str = "Archive ID";
pub const EN_FIELD_VALUE: &str = "Value";
pub const EN_FIELD_INFO_NAME: &str = "Info Name";

pub const EN_GROUP_ANALOG_VALUE: &str = "ANALOG VALUE";
pub const EN_GROUP_ANALOG_INFO: &str = "ANALOG INFO";
pub const EN_GROUP_DISCRETE_VALUE: &str = "DISCRETE VALUE";
pub const EN_GROUP_DISCRETE_INFO: &str = "DISCRETE INFO";

pub const EN_FILE_FILTER: &str = "Template library";
