//! ID newtypes.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// SSA value within one function. Parameters take the first ids.
    ValueId
);
define_id!(
    /// Basic block within one function. Ids stay stable when blocks are pruned.
    BlockId
);
define_id!(
    /// Function within a module.
    FuncId
);
define_id!(
    /// Global variable within a module.
    GlobalId
);
