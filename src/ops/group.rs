//! Grouping of adjacent elements.

use crate::error::SeqResult;
use crate::pair::Pair;
use crate::producer::{Downstream, Flow, Producer};
use crate::sequence::Sequence;

struct GroupAdjacentBy<T, F> {
    upstream: Sequence<T>,
    key: F,
}

impl<T, K, F> Producer<Pair<K, Vec<T>>> for GroupAdjacentBy<T, F>
where
    T: Send + 'static,
    K: PartialEq,
    F: Fn(&T) -> K + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(Pair<K, Vec<T>>) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        let mut current: Option<(K, Vec<T>)> = None;
        self.upstream.produce(&mut |item| {
            let key = (self.key)(&item);
            if let Some((current_key, group)) = current.as_mut() {
                if *current_key == key {
                    group.push(item);
                    return true;
                }
            }
            match current.replace((key, vec![item])) {
                Some((finished_key, group)) => downstream.push(Pair::new(finished_key, group)),
                None => true,
            }
        })?;
        if let Some((key, group)) = current {
            if !downstream.is_stopped() {
                downstream.push(Pair::new(key, group));
            }
        }
        Ok(downstream.flow())
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Group runs of adjacent elements that share a key.
    ///
    /// Emits `Pair(key, run)` for every maximal run, including the last one.
    /// Equal keys that are not adjacent start separate groups.
    pub fn group_adjacent_by<K, F>(self, key: F) -> Sequence<Pair<K, Vec<T>>>
    where
        K: PartialEq + Send + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Sequence::new(GroupAdjacentBy { upstream: self, key })
    }
}
