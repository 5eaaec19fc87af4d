//! Exclusive ownership of driver object names.
//!
//! A [`Handle`] is the only owner of one driver-side object. It cannot be
//! cloned; moving it out with [`Handle::take`] leaves the zero handle behind,
//! and dropping a zero handle does nothing. Dropping a live handle pushes the
//! object onto the destruction queue of the [`Factory`] that created it, which
//! deletes it on the next [`Factory::collect_garbage`].
//!
//! [`Handle`]: struct.Handle.html
//! [`Handle::take`]: struct.Handle.html#method.take
//! [`Factory`]: ../factory/struct.Factory.html
//! [`Factory::collect_garbage`]: ../factory/struct.Factory.html#method.collect_garbage

use crate::queue;
use std::{fmt, marker, mem, ops};

/// Driver object name type. Zero is never a valid object.
pub type Id = u32;

/// The kind of driver object a handle names.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// A shader object.
    Shader,

    /// A linked program.
    Program,

    /// A buffer object.
    Buffer,

    /// A vertex array object.
    VertexArray,

    /// A texture object.
    Texture,
}

/// A released object awaiting deletion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Destroyed {
    /// What kind of object was released.
    pub kind: Kind,

    /// The driver object name.
    pub id: Id,
}

/// Marker types tying a [`Handle`] to one kind of object.
///
/// [`Handle`]: ../struct.Handle.html
pub mod kind {
    use super::Kind;

    /// Implemented by the handle marker types.
    pub trait Object {
        /// The object kind the marker stands for.
        const KIND: Kind;
    }

    macro_rules! impl_object {
        ( $($ident:ident,)* ) => {
            $(
                #[doc = concat!("Marker for ", stringify!($ident), " objects.")]
                #[derive(Debug)]
                pub enum $ident {}

                impl Object for $ident {
                    const KIND: Kind = Kind::$ident;
                }
            )*
        };
    }

    impl_object!(
        Shader,
        Program,
        Buffer,
        VertexArray,
        Texture,
    );
}

/// Owns one driver object and releases it when dropped.
pub struct Handle<K: kind::Object> {
    /// The driver object name, or zero once moved out.
    id: Id,

    /// Returns the object back to the factory upon destruction.
    tx: Option<queue::Sender<Destroyed>>,

    _kind: marker::PhantomData<K>,
}

impl<K: kind::Object> Handle<K> {
    /// Constructor.
    ///
    /// Only the factory mints live handles.
    pub(crate) fn new(id: Id, tx: queue::Sender<Destroyed>) -> Self {
        Self {
            id,
            tx: Some(tx),
            _kind: marker::PhantomData,
        }
    }

    /// Returns the driver object name, zero if unallocated.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the kind of object this handle names.
    pub fn kind(&self) -> Kind {
        K::KIND
    }

    /// Returns `true` if this handle currently owns an object.
    pub fn is_allocated(&self) -> bool {
        self.id != 0
    }

    /// Transfers ownership out of `self`, leaving the zero handle behind.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl<K: kind::Object> Default for Handle<K> {
    fn default() -> Self {
        Self {
            id: 0,
            tx: None,
            _kind: marker::PhantomData,
        }
    }
}

impl<K: kind::Object> ops::Drop for Handle<K> {
    fn drop(&mut self) {
        if self.id == 0 {
            return;
        }
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Destroyed { kind: K::KIND, id: self.id });
        }
        self.id = 0;
    }
}

impl<K: kind::Object> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({})", K::KIND, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::Queue;

    #[test]
    fn drop_releases_exactly_once() {
        let queue = Queue::new();
        let handle: Handle<kind::Buffer> = Handle::new(7, queue.tx());
        drop(handle);
        assert_eq!(queue.next(), Some(Destroyed { kind: Kind::Buffer, id: 7 }));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn take_zeroes_the_source() {
        let queue = Queue::new();
        let mut source: Handle<kind::Texture> = Handle::new(3, queue.tx());
        let target = source.take();
        assert_eq!(source.id(), 0);
        assert!(!source.is_allocated());
        assert_eq!(target.id(), 3);

        drop(source);
        assert_eq!(queue.len(), 0);
        drop(target);
        assert_eq!(queue.next(), Some(Destroyed { kind: Kind::Texture, id: 3 }));
    }

    #[test]
    fn default_handle_is_inert() {
        let handle: Handle<kind::Program> = Handle::default();
        assert_eq!(handle.kind(), Kind::Program);
        assert!(!handle.is_allocated());
    }
}
