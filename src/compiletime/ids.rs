/// The index of a state in the state arena of an [`super::Nfa`] or a [`super::Dfa`].
/// The ids of an automaton are dense and start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct StateID(usize);

impl StateID {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        StateID(index)
    }

    #[inline]
    pub(crate) fn as_usize(&self) -> usize {
        self.0
    }
}

/// Shifting of ids when the states of one automaton are appended to another.
impl std::ops::Add<usize> for StateID {
    type Output = StateID;

    #[inline]
    fn add(self, offset: usize) -> StateID {
        StateID(self.0 + offset)
    }
}

impl<T> std::ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, id: StateID) -> &T {
        &self[id.0]
    }
}

impl<T> std::ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, id: StateID) -> &mut T {
        &mut self[id.0]
    }
}

impl<T> std::ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: StateID) -> &T {
        &self.as_slice()[id]
    }
}

impl<T> std::ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, id: StateID) -> &mut T {
        &mut self.as_mut_slice()[id]
    }
}

impl std::fmt::Display for StateID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
