use core::fmt;
use core::num::NonZeroU32;

/// Typed positions into the parallel per-node and per-reaction arrays.
///
/// Stored as `index + 1` so `Option<NodeId>` costs no extra space.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            /// Position in the array this id indexes.
            pub fn pos(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.index())
            }
        }
    };
}

define_id!(
    /// A node: indexes `tau`, `ymax`, `y0` and the state vector.
    NodeId,
    "node"
);
define_id!(
    /// A reaction: indexes `w`, `n` and `ec50`.
    ReactionId,
    "reaction"
);
