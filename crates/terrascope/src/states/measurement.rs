use crate::context::{Context, InputBinding, Measurement, MeasurementKind, Tool};

use super::{State, StateKind, TOOLS};

const DEPENDENCIES: &[StateKind] = &[StateKind::Default];
const RESTORE: &[StateKind] = &[StateKind::Information];

/// Line, area and height measurement.
///
/// All three share this implementation and exclude each other.
#[derive(Debug)]
pub struct MeasurementState {
    kind: MeasurementKind,
}

impl MeasurementState {
    pub fn new(kind: MeasurementKind) -> Self {
        Self { kind }
    }

    pub fn line() -> Self {
        Self::new(MeasurementKind::Line)
    }

    pub fn area() -> Self {
        Self::new(MeasurementKind::Area)
    }

    pub fn height() -> Self {
        Self::new(MeasurementKind::Height)
    }

    pub fn measurement_kind(&self) -> MeasurementKind {
        self.kind
    }

    fn owns_tool(&self, tool: &Tool) -> bool {
        matches!(tool, Tool::Measure(m) if m.kind == self.kind)
    }
}

impl State for MeasurementState {
    fn kind(&self) -> StateKind {
        match self.kind {
            MeasurementKind::Line => StateKind::LineMeasurement,
            MeasurementKind::Area => StateKind::AreaMeasurement,
            MeasurementKind::Height => StateKind::HeightMeasurement,
        }
    }

    fn exclusive_states(&self) -> &[StateKind] {
        TOOLS
    }

    fn restore_states(&self) -> &[StateKind] {
        RESTORE
    }

    fn dependent_states(&self) -> &[StateKind] {
        DEPENDENCIES
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.tool = Tool::Measure(Measurement::new(self.kind));
        ctx.bind(InputBinding::MeasurePointer);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if self.owns_tool(&ctx.tool) {
            ctx.tool = Tool::None;
        }
        ctx.unbind(InputBinding::MeasurePointer);
        true
    }
}
