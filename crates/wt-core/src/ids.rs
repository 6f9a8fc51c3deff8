use core::fmt;
use core::num::NonZeroU32;

/// Identifier of a stage, assigned by the train builder in creation order.
///
/// Ids survive insertion and removal of other stages, so they name a stage
/// across edits where its position does not. Stored off-by-one in a
/// `NonZeroU32` so `Option<StageId>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StageId(NonZeroU32);

impl StageId {
    /// The id handed out `index`-th by a builder (0-based).
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StageId({})", self.index())
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_survives_storage_offset() {
        for i in [0_u32, 5, 38, 65_535] {
            assert_eq!(StageId::from_index(i).index(), i);
        }
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(StageId::from_index(u32::MAX).index(), u32::MAX - 1);
    }

    #[test]
    fn optional_id_has_no_overhead() {
        assert_eq!(
            core::mem::size_of::<StageId>(),
            core::mem::size_of::<Option<StageId>>()
        );
    }

    #[test]
    fn display_and_order() {
        assert!(StageId::from_index(3) < StageId::from_index(4));
        assert_eq!(StageId::from_index(7).to_string(), "#7");
        assert_eq!(format!("{:?}", StageId::from_index(7)), "StageId(7)");
    }
}
