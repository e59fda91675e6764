//! Step-rate timer quantization.
//!
//! The step-rate timer is a 16-bit counter in clear-on-match mode behind a
//! prescaler. A desired period in timer-clock cycles is mapped onto the
//! finest prescaler whose ceiling still fits 16 bits. Integer truncation
//! makes the achieved period differ from the request; callers must carry
//! [`TimerSetting::actual_cycles`] forward, not the requested value.

/// Largest reload value of the step-rate timer.
pub const MAX_CEILING: u16 = u16::MAX;

/// Clock divisor in front of the step-rate timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// Timer clock / 1.
    Div1,
    /// Timer clock / 8.
    Div8,
    /// Timer clock / 64.
    Div64,
    /// Timer clock / 256.
    Div256,
    /// Timer clock / 1024.
    Div1024,
}

impl Prescaler {
    /// All prescalers, finest first.
    pub const ALL: [Prescaler; 5] = [
        Prescaler::Div1,
        Prescaler::Div8,
        Prescaler::Div64,
        Prescaler::Div256,
        Prescaler::Div1024,
    ];

    /// Divisor value.
    #[inline]
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// Clock-select field of the timer control register (1-based, 0 stops the timer).
    #[inline]
    pub const fn clock_select(self) -> u8 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 2,
            Prescaler::Div64 => 3,
            Prescaler::Div256 => 4,
            Prescaler::Div1024 => 5,
        }
    }
}

/// Prescaler and ceiling pair loaded into the step-rate timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSetting {
    /// Clock divisor.
    pub prescaler: Prescaler,
    /// Compare-match value.
    pub ceiling: u16,
}

impl TimerSetting {
    /// The slowest period the timer can represent.
    pub const SLOWEST: Self = Self {
        prescaler: Prescaler::Div1024,
        ceiling: MAX_CEILING,
    };

    /// Quantize a period of `cycles` timer-clock cycles.
    ///
    /// Picks the smallest divisor whose ceiling fits; periods beyond the
    /// largest divisor clamp to [`TimerSetting::SLOWEST`].
    pub fn from_cycles(cycles: u32) -> Self {
        for prescaler in Prescaler::ALL {
            let ceiling = cycles / prescaler.divisor();
            if ceiling <= u32::from(MAX_CEILING) {
                return Self {
                    prescaler,
                    ceiling: ceiling as u16,
                };
            }
        }
        Self::SLOWEST
    }

    /// Period in timer-clock cycles this setting actually produces.
    #[inline]
    pub fn actual_cycles(self) -> u32 {
        u32::from(self.ceiling) * self.prescaler.divisor()
    }
}
