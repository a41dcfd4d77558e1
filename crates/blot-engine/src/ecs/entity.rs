use std::fmt;

/// Opaque entity handle.
///
/// The rendering manager only keys its tables by it; allocation and
/// generations belong to whoever owns the world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        assert_eq!(Entity::from_raw(42).to_raw(), 42);
    }

    #[test]
    fn display_includes_raw_id() {
        assert_eq!(Entity::from_raw(7).to_string(), "entity#7");
    }
}
