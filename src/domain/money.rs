use serde::{Deserialize, Deserializer};

/// Amount in minor currency units (cents). All ledger arithmetic stays in
/// this integer representation; no floating point anywhere in the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const SCALE: i64 = 100; // 2 decimal places

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn as_minor(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Parses a plain decimal string ("12", "12.3", "-0.05"). Digits past
    /// the second decimal place are rounded half to even.
    pub fn from_decimal_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let neg = s.starts_with('-');
        let body = s.strip_prefix('-').unwrap_or(s);
        let mut parts = body.split('.');
        let int_part = parts.next()?;
        let frac_part = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return None;
        }
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let int_val: i128 = int_part.parse().ok()?;
        let mut minor = int_val.checked_mul(i128::from(Self::SCALE))?;
        let frac = frac_part.as_bytes();
        for i in 0..2 {
            let digit = frac.get(i).map_or(0, |b| i128::from(b - b'0'));
            minor += digit * if i == 0 { 10 } else { 1 };
        }

        // Round the tail half to even.
        if frac.len() > 2 {
            let first = frac[2] - b'0';
            let rest_nonzero = frac[3..].iter().any(|&b| b != b'0');
            if first > 5 || (first == 5 && (rest_nonzero || minor & 1 == 1)) {
                minor += 1;
            }
        }

        let signed = if neg { -minor } else { minor };
        i64::try_from(signed).ok().map(Self)
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl core::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl core::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let abs = self.0.unsigned_abs();
        let int_part = abs / Self::SCALE as u64;
        let frac_part = abs % Self::SCALE as u64;
        if self.0 < 0 {
            write!(f, "-{}.{:02}", int_part, frac_part)
        } else {
            write!(f, "{}.{:02}", int_part, frac_part)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_decimal_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid Money format: {}", s)))
    }
}
