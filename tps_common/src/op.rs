//! Operator boilerplate for newtypes wrapping a single numeric value.
//!
//! `op!(binary Cents, Add, add)` expands to an `impl std::ops::Add for Cents` that
//! forwards to the inner value. The `inplace` and `unary` forms cover the
//! `*Assign` and single-operand traits.

#[macro_export]
macro_rules! op {
    (binary $type:ident, $trait:ident, $func:ident) => {
        impl std::ops::$trait for $type {
            type Output = Self;

            fn $func(self, rhs: Self) -> Self::Output {
                Self(std::ops::$trait::$func(self.value(), rhs.value()))
            }
        }
    };
    (inplace $type:ident, $trait:ident, $func:ident) => {
        impl std::ops::$trait for $type {
            fn $func(&mut self, rhs: Self) {
                std::ops::$trait::$func(&mut self.0, rhs.value())
            }
        }
    };
    (unary $type:ident, $trait:ident, $func:ident) => {
        impl std::ops::$trait for $type {
            type Output = Self;

            fn $func(self) -> Self::Output {
                Self(std::ops::$trait::$func(self.value()))
            }
        }
    };
}
