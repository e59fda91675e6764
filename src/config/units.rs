//! Unit types for physical quantities.
//!
//! Provides type-safe representations of axis positions, step counts and
//! step rates to prevent unit confusion at compile time.

use core::fmt;
use core::ops::{Add, Neg, Sub};

use bitflags::bitflags;
use serde::Deserialize;

/// One of the three machine axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into per-axis arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

bitflags! {
    /// A subset of axes, used to select which axes a homing cycle drives.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AxisSet: u8 {
        /// X axis.
        const X = 1 << 0;
        /// Y axis.
        const Y = 1 << 1;
        /// Z axis.
        const Z = 1 << 2;
    }
}

impl AxisSet {
    /// Set holding a single axis.
    #[inline]
    pub const fn of(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
            Axis::Z => Self::Z,
        }
    }

    /// Check whether `axis` is part of the set.
    #[inline]
    pub fn has(self, axis: Axis) -> bool {
        self.contains(Self::of(axis))
    }

    /// Iterate over the axes in the set, in index order.
    pub fn axes(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.has(*a))
    }
}

/// Linear position in millimeters.
///
/// Used for configuration and the user-facing API. Internally converted to [`Steps`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f32);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Millimeters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Millimeters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Absolute axis position in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Steps(pub i32);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Convert to millimeters using the axis' steps per millimeter.
    #[inline]
    pub fn to_mm(self, steps_per_mm: f32) -> Millimeters {
        Millimeters(self.0 as f32 / steps_per_mm)
    }

    /// Create from millimeters, rounding to the nearest step (halves round up).
    #[inline]
    pub fn from_mm(mm: Millimeters, steps_per_mm: f32) -> Self {
        Self(libm::floorf(mm.0 * steps_per_mm + 0.5) as i32)
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Steps {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Step-event rate in step events per minute.
///
/// Planner rates (`initial_rate`, `nominal_rate`, ...) are expressed in this unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepsPerMinute(pub u32);

impl StepsPerMinute {
    /// Create a new StepsPerMinute value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}
