use core::any::Any;
use core::marker::PhantomData;

/// A pattern type that tests a value and, on success, projects it to a typed view.
///
/// Patterns are never instantiated; they are named as type parameters of the
/// dispatch arms (`case::<IsNoun>(..)`). A projection that only succeeds for one
/// concrete variant is the exact runtime-type test; a projection that succeeds for
/// a family of variants plays the role of a supertype.
pub trait Pattern<V: ?Sized> {
    type View;

    fn project(value: &V) -> Option<Self::View>;
}

/// Matches every value.
pub struct Anything;

impl<V: Clone> Pattern<V> for Anything {
    type View = V;

    fn project(value: &V) -> Option<V> {
        Some(value.clone())
    }
}

/// Exact downcast of an open capability object to the concrete type `T`.
pub struct Exact<T>(PhantomData<fn() -> T>);

impl<'a, T: Any> Pattern<&'a (dyn Any + 'static)> for Exact<T> {
    type View = &'a T;

    fn project(value: &&'a (dyn Any + 'static)) -> Option<&'a T> {
        let object: &'a (dyn Any + 'static) = *value;
        object.downcast_ref::<T>()
    }
}

// Pairs of patterns match pairs of values, component-wise.
impl<A, B, P, Q> Pattern<(A, B)> for (P, Q)
where
    P: Pattern<A>,
    Q: Pattern<B>,
{
    type View = (P::View, Q::View);

    fn project(value: &(A, B)) -> Option<Self::View> {
        let left = P::project(&value.0)?;
        let right = Q::project(&value.1)?;
        Some((left, right))
    }
}
