//! Text form of a template document.
//!
//! `parse` is strict JSON (the backend rejects anything else) and `serialize` writes
//! two-space indented JSON in document order, so the same document always produces
//! the same text.

use crate::model::{
    AnalogDef, BreakerDef, DiscreteDef, Extra, PointValue, TemplateDocument, TemplateRecord,
};
use crate::{EditorError, statics};
use serde_json::Value;
use std::fmt::Write as _;

const INDENT: usize = 2;

pub fn parse(text: &str) -> Result<TemplateDocument, EditorError> {
    serde_json::from_str::<TemplateDocument>(text).map_err(|e| EditorError::Parse(e.to_string()))
}

pub fn serialize(doc: &TemplateDocument) -> String {
    let mut out = String::new();
    let mut obj = ObjectWriter::open(&mut out, 0);
    for (key, record) in doc.iter() {
        obj.member(key, |out, indent| write_record(out, indent, record));
    }
    obj.close();
    out
}

/// Pretty JSON for a single record, as shown next to the form.
pub fn record_snippet(record: &TemplateRecord) -> String {
    let mut out = String::new();
    write_record(&mut out, 0, record);
    out
}

/// Writes `{ "k": v, ... }` one member per line; empty objects collapse to `{}`.
struct ObjectWriter<'a> {
    out: &'a mut String,
    indent: usize,
    members: usize,
}

impl<'a> ObjectWriter<'a> {
    fn open(out: &'a mut String, indent: usize) -> Self {
        out.push('{');
        Self {
            out,
            indent,
            members: 0,
        }
    }

    fn member(&mut self, key: &str, write_value: impl FnOnce(&mut String, usize)) {
        if self.members > 0 {
            self.out.push(',');
        }
        self.out.push('\n');
        push_indent(self.out, self.indent + INDENT);
        write_escaped_string(self.out, key);
        self.out.push_str(": ");
        write_value(&mut *self.out, self.indent + INDENT);
        self.members += 1;
    }

    fn string(&mut self, key: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.member(key, |out, _| write_escaped_string(out, value));
        }
    }

    fn extra(&mut self, extra: &Extra) {
        for (key, value) in extra {
            self.member(key, |out, indent| write_value(out, indent, value));
        }
    }

    fn close(self) {
        if self.members > 0 {
            self.out.push('\n');
            push_indent(self.out, self.indent);
        }
        self.out.push('}');
    }
}

fn write_record(out: &mut String, indent: usize, record: &TemplateRecord) {
    let mut obj = ObjectWriter::open(out, indent);
    if let Some(analog) = &record.analog {
        obj.member(statics::TPL_ANALOG, |out, indent| {
            write_analog(out, indent, analog)
        });
    }
    if let Some(discrete) = &record.discrete {
        obj.member(statics::TPL_DISCRETE, |out, indent| {
            write_discrete(out, indent, discrete)
        });
    }
    if let Some(breaker) = &record.breaker {
        obj.member(statics::TPL_BREAKER, |out, indent| {
            write_breaker(out, indent, breaker)
        });
    }
    obj.extra(&record.extra);
    obj.close();
}

fn write_analog(out: &mut String, indent: usize, def: &AnalogDef) {
    let mut obj = ObjectWriter::open(out, indent);
    obj.string(statics::TPL_NAME, def.name.as_ref());
    obj.string(statics::TPL_ELEMENT_TYPE, def.element_type.as_ref());
    obj.string(
        statics::TPL_AREA_OF_RESPONSIBILITY_ID,
        def.area_of_responsibility_id.as_ref(),
    );
    obj.string(statics::TPL_ELEMENT_NAME, def.element_name.as_ref());
    obj.string(statics::TPL_MEASUREMENT_TYPE, def.measurement_type.as_ref());
    obj.string(statics::TPL_UNIT_OF_MEASURE, def.unit_of_measure.as_ref());
    obj.string(statics::TPL_WEIGHTING_SE, def.weighting_se.as_ref());
    obj.string(statics::TPL_MULTIPLIER, def.multiplier.as_ref());
    obj.string(statics::TPL_PHASES, def.phases.as_ref());
    if let Some(point) = &def.analog_value {
        obj.member(statics::TPL_ANALOG_VALUE, |out, indent| {
            write_point(out, indent, point)
        });
    }
    if let Some(point) = &def.analog_info {
        obj.member(statics::TPL_ANALOG_INFO, |out, indent| {
            write_point(out, indent, point)
        });
    }
    obj.extra(&def.extra);
    obj.close();
}

fn write_discrete(out: &mut String, indent: usize, def: &DiscreteDef) {
    let mut obj = ObjectWriter::open(out, indent);
    obj.string(statics::TPL_NAME, def.name.as_ref());
    obj.string(statics::TPL_ELEMENT_TYPE, def.element_type.as_ref());
    obj.string(
        statics::TPL_AREA_OF_RESPONSIBILITY_ID,
        def.area_of_responsibility_id.as_ref(),
    );
    obj.string(statics::TPL_ELEMENT_NAME, def.element_name.as_ref());
    obj.string(statics::TPL_MEASUREMENT_TYPE, def.measurement_type.as_ref());
    if let Some(point) = &def.discrete_value {
        obj.member(statics::TPL_DISCRETE_VALUE, |out, indent| {
            write_point(out, indent, point)
        });
    }
    if let Some(point) = &def.discrete_info {
        obj.member(statics::TPL_DISCRETE_INFO, |out, indent| {
            write_point(out, indent, point)
        });
    }
    obj.extra(&def.extra);
    obj.close();
}

fn write_breaker(out: &mut String, indent: usize, def: &BreakerDef) {
    let mut obj = ObjectWriter::open(out, indent);
    obj.string(statics::TPL_NAME, def.name.as_ref());
    obj.string(statics::TPL_ELEMENT_TYPE, def.element_type.as_ref());
    obj.string(
        statics::TPL_AREA_OF_RESPONSIBILITY_ID,
        def.area_of_responsibility_id.as_ref(),
    );
    obj.string(statics::TPL_FLOW_BREAKER_FLAG, def.flow_breaker_flag.as_ref());
    obj.string(statics::TPL_VOLT_MAG_LIMIT_CA, def.volt_mag_limit_ca.as_ref());
    obj.string(statics::TPL_DMS_FLAG, def.dms_flag.as_ref());
    obj.extra(&def.extra);
    obj.close();
}

fn write_point(out: &mut String, indent: usize, point: &PointValue) {
    let mut obj = ObjectWriter::open(out, indent);
    obj.string(statics::TPL_NAME, point.name.as_ref());
    obj.string(statics::TPL_ARCHIVE, point.archive.as_ref());
    obj.string(statics::TPL_VALUE, point.value.as_ref());
    obj.string(statics::TPL_INFO_NAME, point.info_name.as_ref());
    obj.extra(&point.extra);
    obj.close();
}

fn write_value(out: &mut String, indent: usize, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_escaped_string(out, s),
        Value::Array(values) => {
            out.push('[');
            if values.is_empty() {
                out.push(']');
                return;
            }
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                push_indent(out, indent + INDENT);
                write_value(out, indent + INDENT, v);
            }
            out.push('\n');
            push_indent(out, indent);
            out.push(']');
        }
        Value::Object(map) => {
            let mut obj = ObjectWriter::open(out, indent);
            for (k, v) in map {
                obj.member(k, |out, indent| write_value(out, indent, v));
            }
            obj.close();
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => {
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
