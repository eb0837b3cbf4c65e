//! Data epochs and content identity tokens.
//!
//! Every fitting session is keyed by an [`IdentityToken`]. When the token
//! changes, the session forgets its progress and starts over from the most
//! detailed presentation. Tokens combine the data [`Epoch`], which advances
//! on every successful fetch, with a key describing what the region shows.
//!
//! Re-renders caused by the fitting itself must not change the token, or a
//! session would never settle. Keys should therefore be derived from the
//! payload, never from fitting state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A counter that advances whenever new upstream data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch before any data has been received.
    pub const ZERO: Self = Self(0);

    /// Returns the following epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_fit::Epoch;
    ///
    /// assert_eq!(Epoch::ZERO.next().get(), 1);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An opaque value identifying the content a region is showing.
///
/// # Examples
///
/// ```
/// use headway_fit::{Epoch, IdentityToken};
///
/// let a = IdentityToken::of(Epoch::ZERO, "alert-1");
/// assert_eq!(a, IdentityToken::of(Epoch::ZERO, "alert-1"));
/// assert_ne!(a, IdentityToken::of(Epoch::ZERO.next(), "alert-1"));
/// assert_ne!(a, IdentityToken::of(Epoch::ZERO, "alert-2"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityToken(u64);

impl IdentityToken {
    /// Derives a token from the data epoch and a content key.
    #[must_use]
    pub fn of<K: Hash + ?Sized>(epoch: Epoch, key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        epoch.hash(&mut hasher);
        key.hash(&mut hasher);
        Self(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_stable_for_same_input() {
        let epoch = Epoch::ZERO.next().next();
        let key = ("departures", 3_usize);
        assert_eq!(IdentityToken::of(epoch, &key), IdentityToken::of(epoch, &key));
    }

    #[test]
    fn epoch_wraps() {
        assert_eq!(Epoch(u64::MAX).next(), Epoch::ZERO);
    }
}
