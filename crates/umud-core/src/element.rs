//! Bounded numeric attribute cells
//!
//! An [`Element`] is a live view of one numeric value on an entity, backed
//! by the entity's durable attributes. Its four fields are stored sparsely
//! under `{name}_value`, `{name}_min`, `{name}_max` and `{name}_breakpoint`;
//! a field equal to its default is never written.

use crate::attributes::AttributeStore;
use crate::{Entity, Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Rem, RemAssign, Sub, SubAssign};
use std::rc::Rc;

/// Default values for one named cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub name: String,
    #[serde(default = "default_value")]
    pub value: f64,
    #[serde(default = "default_min")]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default)]
    pub breakpoint: f64,
}

fn default_value() -> f64 {
    100.0
}

fn default_min() -> f64 {
    -100.0
}

fn default_max() -> f64 {
    100.0
}

impl ElementSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: default_value(),
            min: default_min(),
            max: default_max(),
            breakpoint: 0.0,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: f64) -> Self {
        self.breakpoint = breakpoint;
        self
    }
}

/// A callback run against the owning entity
pub type Hook = Rc<dyn Fn(&mut Entity)>;

/// Callbacks registered for one cell name
#[derive(Clone, Default)]
pub struct ElementHooks {
    pub on_min: Option<Hook>,
    pub on_max: Option<Hook>,
    pub on_descending: Option<Hook>,
    pub on_ascending: Option<Hook>,
}

impl ElementHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_min(mut self, hook: impl Fn(&mut Entity) + 'static) -> Self {
        self.on_min = Some(Rc::new(hook));
        self
    }

    pub fn on_max(mut self, hook: impl Fn(&mut Entity) + 'static) -> Self {
        self.on_max = Some(Rc::new(hook));
        self
    }

    pub fn on_descending(mut self, hook: impl Fn(&mut Entity) + 'static) -> Self {
        self.on_descending = Some(Rc::new(hook));
        self
    }

    pub fn on_ascending(mut self, hook: impl Fn(&mut Entity) + 'static) -> Self {
        self.on_ascending = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for ElementHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHooks")
            .field("on_min", &self.on_min.is_some())
            .field("on_max", &self.on_max.is_some())
            .field("on_descending", &self.on_descending.is_some())
            .field("on_ascending", &self.on_ascending.is_some())
            .finish()
    }
}

/// Direction of a breakpoint crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Descending,
    Ascending,
}

/// Which bound a write landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Min,
    Max,
}

/// What a single write did relative to the breakpoint and bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub crossing: Option<Crossing>,
    pub boundary: Option<Boundary>,
}

impl Transition {
    /// Compare the value before a write with the value after clamping
    pub fn between(previous: f64, current: f64, min: f64, max: f64, breakpoint: f64) -> Self {
        let crossing = if previous > breakpoint && current <= breakpoint {
            Some(Crossing::Descending)
        } else if previous <= breakpoint && current > breakpoint {
            Some(Crossing::Ascending)
        } else {
            None
        };
        let boundary = if current <= min && previous > min {
            Some(Boundary::Min)
        } else if current >= max && previous < max {
            Some(Boundary::Max)
        } else {
            None
        };
        Self { crossing, boundary }
    }

    pub fn is_quiet(&self) -> bool {
        self.crossing.is_none() && self.boundary.is_none()
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a number with at most two decimals, dropping `.0` on whole values
pub fn format_number(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

const FIELDS: [&str; 4] = ["value", "min", "max", "breakpoint"];

/// Live handle to a cell on an entity
///
/// Borrowing the entity mutably is what ties the cell to its owner; the
/// handle itself owns no state beyond a copy of the cell's defaults.
pub struct Element<'a> {
    entity: &'a mut Entity,
    spec: ElementSpec,
}

impl<'a> Element<'a> {
    pub(crate) fn new(entity: &'a mut Entity, spec: ElementSpec) -> Self {
        Self { entity, spec }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ElementSpec {
        &self.spec
    }

    fn key(&self, field: &str) -> String {
        format!("{}_{}", self.spec.name, field)
    }

    fn read(&self, field: &str, default: f64) -> f64 {
        self.entity
            .attributes
            .get(&self.key(field))
            .and_then(Value::as_number)
            .unwrap_or(default)
    }

    fn write(&mut self, field: &str, value: f64, default: f64) {
        let key = self.key(field);
        if value == default {
            self.entity.attributes.remove(&key);
        } else {
            self.entity.attributes.add(&key, Value::Float(value));
        }
    }

    /// Current value, or the default if nothing is stored
    pub fn get(&self) -> f64 {
        self.read("value", self.spec.value)
    }

    pub fn min(&self) -> f64 {
        self.read("min", self.spec.min)
    }

    pub fn max(&self) -> f64 {
        self.read("max", self.spec.max)
    }

    pub fn breakpoint(&self) -> f64 {
        self.read("breakpoint", self.spec.breakpoint)
    }

    /// Check whether the value field is currently stored
    pub fn is_persisted(&self) -> bool {
        self.entity.attributes.has(&self.key("value"))
    }

    /// Clamp, store and dispatch callbacks. Returns the stored value.
    ///
    /// Non-finite input is logged and ignored.
    pub fn set(&mut self, value: f64) -> f64 {
        let previous = self.get();
        if !value.is_finite() {
            tracing::warn!(
                entity = %self.entity.id,
                cell = %self.spec.name,
                value,
                "rejected non-finite cell value"
            );
            return previous;
        }

        let (min, max) = (self.min(), self.max());
        let current = value.max(min).min(max);
        let default = self.spec.value;
        self.write("value", current, default);

        let transition = Transition::between(previous, current, min, max, self.breakpoint());
        if !transition.is_quiet() {
            self.dispatch(transition);
        }
        current
    }

    /// Dynamic entry point for values that did not come from typed code
    pub fn set_value(&mut self, value: &Value) -> Result<f64> {
        match value.as_number() {
            Some(number) => Ok(self.set(number)),
            None => Err(Error::invalid_value(
                format!("{} on {}", self.spec.name, self.entity.id),
                value.type_name(),
            )),
        }
    }

    pub fn set_min(&mut self, min: f64) -> Result<()> {
        if !min.is_finite() || min > self.max() {
            return Err(Error::invalid_value(self.key("min"), min.to_string()));
        }
        let default = self.spec.min;
        self.write("min", min, default);
        self.reclamp();
        Ok(())
    }

    pub fn set_max(&mut self, max: f64) -> Result<()> {
        if !max.is_finite() || max < self.min() {
            return Err(Error::invalid_value(self.key("max"), max.to_string()));
        }
        let default = self.spec.max;
        self.write("max", max, default);
        self.reclamp();
        Ok(())
    }

    pub fn set_breakpoint(&mut self, breakpoint: f64) -> Result<()> {
        if !breakpoint.is_finite() {
            return Err(Error::invalid_value(
                self.key("breakpoint"),
                breakpoint.to_string(),
            ));
        }
        let default = self.spec.breakpoint;
        self.write("breakpoint", breakpoint, default);
        Ok(())
    }

    /// Pull the value back inside moved bounds. Landing on a bound this
    /// way always counts as reaching it.
    fn reclamp(&mut self) {
        let previous = self.get();
        let (min, max) = (self.min(), self.max());
        let current = previous.max(min).min(max);
        if current == previous {
            return;
        }
        let default = self.spec.value;
        self.write("value", current, default);

        let mut transition = Transition::between(previous, current, min, max, self.breakpoint());
        transition.boundary = Some(if current >= max {
            Boundary::Max
        } else {
            Boundary::Min
        });
        self.dispatch(transition);
    }

    /// `100 * value / max`
    pub fn percent(&self) -> f64 {
        let max = self.max();
        if max == 0.0 {
            return 0.0;
        }
        100.0 * self.get() / max
    }

    /// `100 * (value - breakpoint) / (max - breakpoint)`, rounded to 2 decimals
    pub fn breakpoint_percent(&self) -> f64 {
        let breakpoint = self.breakpoint();
        let span = self.max() - breakpoint;
        if span == 0.0 {
            return 0.0;
        }
        round2(100.0 * (self.get() - breakpoint) / span)
    }

    pub fn floor_div(&self, rhs: f64) -> f64 {
        (self.get() / rhs).floor()
    }

    pub fn pow(&self, rhs: f64) -> f64 {
        self.get().powf(rhs)
    }

    /// Store `floor(value / rhs)`
    pub fn floor_div_assign(&mut self, rhs: f64) -> f64 {
        let value = self.floor_div(rhs);
        self.set(value)
    }

    /// Store `value.powf(rhs)`
    pub fn pow_assign(&mut self, rhs: f64) -> f64 {
        let value = self.pow(rhs);
        self.set(value)
    }

    /// Remove every stored field, reverting to defaults
    pub fn delete(&mut self) {
        for field in FIELDS {
            let key = self.key(field);
            self.entity.attributes.remove(&key);
        }
    }

    fn dispatch(&mut self, transition: Transition) {
        let name = self.spec.name.clone();
        if self.entity.dispatching.contains(&name) {
            tracing::debug!(entity = %self.entity.id, cell = %name, "nested cell callback suppressed");
            return;
        }
        let Some(hooks) = self.entity.hooks.get(&name).cloned() else {
            return;
        };

        self.entity.dispatching.insert(name.clone());
        let crossing = match transition.crossing {
            Some(Crossing::Descending) => hooks.on_descending,
            Some(Crossing::Ascending) => hooks.on_ascending,
            None => None,
        };
        if let Some(hook) = crossing {
            hook(&mut *self.entity);
        }
        let boundary = match transition.boundary {
            Some(Boundary::Min) => hooks.on_min,
            Some(Boundary::Max) => hooks.on_max,
            None => None,
        };
        if let Some(hook) = boundary {
            hook(&mut *self.entity);
        }
        self.entity.dispatching.remove(&name);
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.get()))
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("entity", &self.entity.id)
            .field("name", &self.spec.name)
            .field("value", &self.get())
            .finish()
    }
}

impl PartialEq<f64> for Element<'_> {
    fn eq(&self, other: &f64) -> bool {
        self.get() == *other
    }
}

impl PartialOrd<f64> for Element<'_> {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.get().partial_cmp(other)
    }
}

macro_rules! element_ops {
    ($($trait:ident $method:ident $assign_trait:ident $assign_method:ident $op:tt),* $(,)?) => {
        $(
            impl $trait<f64> for &Element<'_> {
                type Output = f64;

                fn $method(self, rhs: f64) -> f64 {
                    self.get() $op rhs
                }
            }

            impl $trait<&Element<'_>> for f64 {
                type Output = f64;

                fn $method(self, rhs: &Element<'_>) -> f64 {
                    self $op rhs.get()
                }
            }

            impl $assign_trait<f64> for Element<'_> {
                fn $assign_method(&mut self, rhs: f64) {
                    let value = self.get() $op rhs;
                    self.set(value);
                }
            }
        )*
    };
}

element_ops! {
    Add add AddAssign add_assign +,
    Sub sub SubAssign sub_assign -,
    Mul mul MulAssign mul_assign *,
    Div div DivAssign div_assign /,
    Rem rem RemAssign rem_assign %,
}
