// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Weighted soft-constraint penalty. The roster objective is a sum of these.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Penalty(i64);

impl Penalty {
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn saturating_add(self, other: Penalty) -> Penalty {
        Penalty(self.0.saturating_add(other.0))
    }
}

impl From<i64> for Penalty {
    #[inline]
    fn from(value: i64) -> Self {
        Penalty(value)
    }
}

impl std::ops::Add for Penalty {
    type Output = Penalty;

    #[inline]
    fn add(self, rhs: Penalty) -> Penalty {
        Penalty(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Penalty {
    #[inline]
    fn add_assign(&mut self, rhs: Penalty) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Penalty {
    #[inline]
    fn sum<I: Iterator<Item = Penalty>>(iter: I) -> Penalty {
        iter.fold(Penalty::zero(), |acc, p| acc.saturating_add(p))
    }
}

impl std::fmt::Display for Penalty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_identity() {
        let p = Penalty::new(30);
        assert_eq!(p + Penalty::zero(), p);
        assert!(Penalty::zero().is_zero());
    }

    #[test]
    fn test_sum_over_iterator() {
        let total: Penalty = [10, 8, 5, 3].into_iter().map(Penalty::new).sum();
        assert_eq!(total.value(), 26);
    }

    #[test]
    fn test_saturating_add_does_not_overflow() {
        let p = Penalty::new(i64::MAX).saturating_add(Penalty::new(1));
        assert_eq!(p.value(), i64::MAX);
    }
}
