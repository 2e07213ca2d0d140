//! Pages: what they contain, how they run and how to replay input against them

pub mod host;
pub mod script;
pub mod spec;

pub use host::{
    Element, ElementId, ElementKind, FrameReport, PageEffect, PageHost, PageInput, Snapshot,
};
pub use script::{Script, ScriptEvent, TraceCause, TraceEntry};
pub use spec::{EmbedSpec, MetricSpec, NavLink, PageSpec, SectionSpec};
