// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Execution-layer arguments
//!
//! A [`Param`] is what the execution wrapper receives for each placeholder:
//! either a scalar or an ordered sequence awaiting `IN (?)`-expansion.
//! [`IntoParams`] lets call sites pass tuples of mixed argument types.

use sqlgate_clause::{Value, Var};

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    /// Sequence bound to a single `?`; expanded to the right arity before
    /// dispatch (except inside INSERT statements).
    List(Vec<Value>),
}

impl std::convert::From<Value> for Param {
    fn from(v: Value) -> Self {
        Param::Value(v)
    }
}

impl<T> std::convert::From<Vec<T>> for Param
where
    T: Into<Value>,
{
    fn from(values: Vec<T>) -> Self {
        Param::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! param_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl std::convert::From<$ty> for Param {
                fn from(v: $ty) -> Self {
                    Param::Value(v.into())
                }
            }
        )*
    };
}

param_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String);

impl Param {
    /// The builder-level var carrying the same payload.
    pub(crate) fn into_var(self) -> Var {
        match self {
            Param::Value(v) => Var::Value(v),
            Param::List(values) => Var::List(values.into_iter().map(Var::Value).collect()),
        }
    }
}

/// Conversion of heterogeneous argument packs into a positional list.
pub trait IntoParams {
    fn into_params(self) -> Vec<Param>;
}

impl IntoParams for () {
    fn into_params(self) -> Vec<Param> {
        Vec::new()
    }
}

impl IntoParams for Vec<Param> {
    fn into_params(self) -> Vec<Param> {
        self
    }
}

macro_rules! impl_into_params_for_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> IntoParams for ($($name,)+)
        where
            $($name: Into<Param>,)+
        {
            #[allow(non_snake_case)]
            fn into_params(self) -> Vec<Param> {
                let ($($name,)+) = self;
                vec![$($name.into(),)+]
            }
        }
    };
}

impl_into_params_for_tuple!(T1);
impl_into_params_for_tuple!(T1, T2);
impl_into_params_for_tuple!(T1, T2, T3);
impl_into_params_for_tuple!(T1, T2, T3, T4);
impl_into_params_for_tuple!(T1, T2, T3, T4, T5);
impl_into_params_for_tuple!(T1, T2, T3, T4, T5, T6);
impl_into_params_for_tuple!(T1, T2, T3, T4, T5, T6, T7);
impl_into_params_for_tuple!(T1, T2, T3, T4, T5, T6, T7, T8);
