use super::{BinaryOperator, Expr};
use crate::model::{ExpressionId, VarId};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! impl_binary_op {
    ($trt:ident, $operator:ident, $op:ident) => {
        impl<R: Into<Expr>> $trt<R> for Expr {
            type Output = Expr;
            fn $operator(self, other: R) -> Expr {
                Expr::binary(BinaryOperator::$op, self, other.into())
            }
        }

        impl<R: Into<Expr>> $trt<R> for &Expr {
            type Output = Expr;
            fn $operator(self, other: R) -> Expr {
                Expr::binary(BinaryOperator::$op, self.clone(), other.into())
            }
        }

        impl<R: Into<Expr>> $trt<R> for VarId {
            type Output = Expr;
            fn $operator(self, other: R) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other.into())
            }
        }

        impl<R: Into<Expr>> $trt<R> for ExpressionId {
            type Output = Expr;
            fn $operator(self, other: R) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other.into())
            }
        }

        impl $trt<Expr> for f64 {
            type Output = Expr;
            fn $operator(self, other: Expr) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other)
            }
        }

        impl $trt<&Expr> for f64 {
            type Output = Expr;
            fn $operator(self, other: &Expr) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other.clone())
            }
        }

        impl $trt<VarId> for f64 {
            type Output = Expr;
            fn $operator(self, other: VarId) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other.into())
            }
        }

        impl $trt<ExpressionId> for f64 {
            type Output = Expr;
            fn $operator(self, other: ExpressionId) -> Expr {
                Expr::binary(BinaryOperator::$op, self.into(), other.into())
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Negation(Box::new(self))
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        -self.clone()
    }
}

impl Neg for VarId {
    type Output = Expr;
    fn neg(self) -> Expr {
        -Expr::from(self)
    }
}

impl Neg for ExpressionId {
    type Output = Expr;
    fn neg(self) -> Expr {
        -Expr::from(self)
    }
}
