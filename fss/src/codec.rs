//! Translation between the widget/sensor hierarchy of a sensing stack and
//! positional [`TouchVector`]s.

use heapless::Vec;

use crate::sensor::SensorStatus;
use crate::vector::{TouchVector, CAPACITY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    Button,
    Slider,
    Proximity,
}

/// Address of one sensor within the sensing hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorHandle {
    pub widget: usize,
    pub sensor: usize,
}

/// The sensing stack as seen by the FSS codec.
///
/// Implementations must report a stable hierarchy: the same widgets, kinds and
/// sensor counts on every call.
pub trait SensingContext {
    fn widget_count(&self) -> usize;
    fn widget_kind(&self, widget: usize) -> WidgetKind;
    fn sensor_count(&self, widget: usize) -> usize;
    fn status(&self, handle: SensorHandle) -> SensorStatus;
    fn set_status(&mut self, handle: SensorHandle, status: SensorStatus);

    fn read_touch(&self, handle: SensorHandle) -> bool {
        self.status(handle).contains(SensorStatus::TOUCH)
    }

    /// Overwrite the sensor's status so only the touch flag reflects `touch`
    fn write_status(&mut self, handle: SensorHandle, touch: bool) {
        let status = if touch {
            SensorStatus::TOUCH
        } else {
            SensorStatus::empty()
        };
        self.set_status(handle, status);
    }
}

/// Iterate the handles of all button sensors in enumeration order
pub fn button_sensors<C: SensingContext + ?Sized>(ctx: &C) -> impl Iterator<Item = SensorHandle> + '_ {
    (0..ctx.widget_count())
        .filter(move |&w| ctx.widget_kind(w) == WidgetKind::Button)
        .flat_map(move |w| {
            (0..ctx.sensor_count(w)).map(move |sensor| SensorHandle { widget: w, sensor })
        })
}

/// The raw touch vector of one cycle together with the ordered sensor handles
/// its bits refer to
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    handles: Vec<SensorHandle, CAPACITY>,
    current: TouchVector,
}

impl Snapshot {
    pub fn current(&self) -> TouchVector {
        self.current
    }

    /// Number of enumerated sensors
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[SensorHandle] {
        &self.handles
    }
}

/// Read the touch flag of every button sensor into a positional vector.
///
/// Sensors past [`CAPACITY`] are not enumerated; `Fss::new` rejects such
/// configurations before any cycle runs.
pub fn collect<C: SensingContext + ?Sized>(ctx: &C) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for handle in button_sensors(ctx) {
        let index = snapshot.handles.len();
        if snapshot.handles.push(handle).is_err() {
            break;
        }
        if ctx.read_touch(handle) {
            snapshot.current = snapshot.current.with(index);
        }
    }

    snapshot
}

/// Write `resolved` back to the sensors recorded in `snapshot`.
///
/// Only the low `snapshot.len()` bits are consumed. Each sensor's auxiliary
/// flags are cleared along the way.
pub fn writeback<C: SensingContext + ?Sized>(ctx: &mut C, snapshot: &Snapshot, resolved: TouchVector) {
    for (index, handle) in snapshot.handles.iter().enumerate() {
        ctx.write_status(*handle, resolved.bit(index));
    }
}
