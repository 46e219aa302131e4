//! Append-only byte buffer packing values of a fixed set of record shapes.
//!
//! Pushing costs one monotonic buffer append and no per-event allocation;
//! the resulting bytes are trivially copyable and ship as-is.
//!
//! Wire layout per record: `[type_tag: u8] [size: u32, dynamic records only] [payload]`,
//! where the tag is the index of the record's type in the queue's type list.

use crate::UserDefinedType;

pub trait HeterogeneousQueue: Sized {
    type Item;

    fn new(buffer_size: usize) -> Self;
    fn len_bytes(&self) -> usize;
    fn capacity_bytes(&self) -> usize;
    fn nb_objects(&self) -> usize;
    fn as_bytes(&self) -> &[u8];

    /// Layout of every record shape admitted in this queue, in tag order.
    fn reflect_contained() -> Vec<UserDefinedType>;

    /// Decodes the record starting at `cursor` and advances the cursor past it.
    ///
    /// # Safety
    ///
    /// `cursor` must be 0 or a value previously advanced to by this function
    /// on the same queue.
    unsafe fn read_value_at(&self, cursor: &mut usize) -> Self::Item;

    fn iter(&self) -> QueueIterator<'_, Self> {
        QueueIterator {
            queue: self,
            cursor: 0,
        }
    }

    fn for_each<F>(&self, mut fun: F)
    where
        F: FnMut(Self::Item),
    {
        for item in self.iter() {
            fun(item);
        }
    }
}

pub struct QueueIterator<'a, Q> {
    queue: &'a Q,
    cursor: usize,
}

impl<Q> Iterator for QueueIterator<'_, Q>
where
    Q: HeterogeneousQueue,
{
    type Item = <Q as HeterogeneousQueue>::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.queue.len_bytes() {
            None
        } else {
            Some(unsafe { self.queue.read_value_at(&mut self.cursor) })
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! impl_queue_type_index {
    ( $trait_name:ident, $index:expr, $head:ident ) => {
        impl $trait_name for $head {
            const TYPE_INDEX: u8 = $index;
        }
    };
    ( $trait_name:ident, $index:expr, $head:ident, $( $tail:ident ),+ ) => {
        impl $trait_name for $head {
            const TYPE_INDEX: u8 = $index;
        }
        $crate::impl_queue_type_index!( $trait_name, $index + 1u8, $( $tail ),+ );
    };
}

/// Declares a queue struct over a fixed type list along with its tagged-value
/// enum (`<Name>Any`) and the tag-assignment trait (`<Name>TypeIndex`).
#[macro_export]
macro_rules! declare_queue_struct {
    ( struct $type_name:ident < $( $types:ident ),* $(,)? > {} ) => {
        $crate::paste::paste! {
            #[derive(Debug)]
            pub enum [<$type_name Any>] {
                $( $types($types), )*
            }

            pub trait [<$type_name TypeIndex>] {
                const TYPE_INDEX: u8;
            }

            $crate::impl_queue_type_index!( [<$type_name TypeIndex>], 0u8, $( $types ),* );

            #[derive(Debug)]
            pub struct $type_name {
                buffer: Vec<u8>,
                nb_objects: usize,
            }

            impl $type_name {
                pub fn push<T>(&mut self, value: T)
                where
                    T: $crate::InProcSerialize + [<$type_name TypeIndex>],
                {
                    self.nb_objects += 1;
                    self.buffer.push(<T as [<$type_name TypeIndex>]>::TYPE_INDEX);
                    match <T as $crate::InProcSerialize>::IN_PROC_SIZE {
                        $crate::InProcSize::Const(_) => {
                            $crate::InProcSerialize::write_value(&value, &mut self.buffer);
                        }
                        $crate::InProcSize::Dynamic => {
                            let value_size =
                                $crate::InProcSerialize::get_value_size(&value).unwrap();
                            $crate::write_any(&mut self.buffer, &value_size);
                            $crate::InProcSerialize::write_value(&value, &mut self.buffer);
                        }
                    }
                }
            }

            impl $crate::HeterogeneousQueue for $type_name {
                type Item = [<$type_name Any>];

                fn new(buffer_size: usize) -> Self {
                    Self {
                        buffer: Vec::with_capacity(buffer_size),
                        nb_objects: 0,
                    }
                }

                fn len_bytes(&self) -> usize {
                    self.buffer.len()
                }

                fn capacity_bytes(&self) -> usize {
                    self.buffer.capacity()
                }

                fn nb_objects(&self) -> usize {
                    self.nb_objects
                }

                fn as_bytes(&self) -> &[u8] {
                    &self.buffer
                }

                fn reflect_contained() -> Vec<$crate::UserDefinedType> {
                    vec![ $( <$types as $crate::Reflect>::reflect(), )* ]
                }

                #[allow(unsafe_code)]
                unsafe fn read_value_at(&self, cursor: &mut usize) -> Self::Item {
                    let type_index = self.buffer[*cursor];
                    *cursor += 1;
                    match type_index {
                        $(
                            tag if tag == <$types as [<$type_name TypeIndex>]>::TYPE_INDEX => {
                                let value = match <$types as $crate::InProcSerialize>::IN_PROC_SIZE {
                                    $crate::InProcSize::Const(size) => {
                                        let value = <$types as $crate::InProcSerialize>::read_value(
                                            &self.buffer[*cursor..*cursor + size],
                                        );
                                        *cursor += size;
                                        value
                                    }
                                    $crate::InProcSize::Dynamic => {
                                        let value_size = $crate::read_any::<u32>(
                                            self.buffer.as_ptr().add(*cursor),
                                        ) as usize;
                                        *cursor += std::mem::size_of::<u32>();
                                        let value = <$types as $crate::InProcSerialize>::read_value(
                                            &self.buffer[*cursor..*cursor + value_size],
                                        );
                                        *cursor += value_size;
                                        value
                                    }
                                };
                                [<$type_name Any>]::$types(value)
                            }
                        )*
                        unknown => panic!(
                            "invalid type index {} in {}",
                            unknown,
                            stringify!($type_name)
                        ),
                    }
                }
            }
        }
    };
}
