use crate::Reduce;
use paste::paste;

macro_rules! impl_reduce {
    ( $first:literal, $($rest:literal,)+ ) => { paste!{
        impl<S, [<F $first>], $([<F $rest>],)+ > Reduce<S> for ( [<F $first>], $([<F $rest>],)+ )
        where
            [<F $first>]: FnOnce(&S) -> S,
            $( [<F $rest>]: FnOnce(&S) -> S, )+
        {
            fn fold(self, state: &S) -> S {
                let state = (self.$first)(state);
                $( let state = (self.$rest)(&state); )+
                state
            }
        }
    }};
}

impl_reduce!(0, 1,);
impl_reduce!(0, 1, 2,);
impl_reduce!(0, 1, 2, 3,);
impl_reduce!(0, 1, 2, 3, 4,);
impl_reduce!(0, 1, 2, 3, 4, 5,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6, 7,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6, 7, 8,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10,);
impl_reduce!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11,);
