use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindingPower {
    None,
    Assignment, // = += ... (right-associative)
    LogicalOr,  // ||
    LogicalAnd, // &&
    BitwiseOr,  // |
    BitwiseXor, // ^
    BitwiseAnd, // &
    Equality,   // == !=
    Comparison, // < > <= >=
    Shift,      // << >>
    Term,       // + -
    Factor,     // * / %
    Unary,      // Prefix - ! ++ --
    Postfix,    // Postfix ++ --
    Primary,    // Literals, identifiers
    More(u32),
}

const LEVELS: [BindingPower; 15] = [
    BindingPower::None,
    BindingPower::Assignment,
    BindingPower::LogicalOr,
    BindingPower::LogicalAnd,
    BindingPower::BitwiseOr,
    BindingPower::BitwiseXor,
    BindingPower::BitwiseAnd,
    BindingPower::Equality,
    BindingPower::Comparison,
    BindingPower::Shift,
    BindingPower::Term,
    BindingPower::Factor,
    BindingPower::Unary,
    BindingPower::Postfix,
    BindingPower::Primary,
];

impl From<u32> for BindingPower {
    fn from(val: u32) -> Self {
        LEVELS.get(val as usize).copied().unwrap_or(BindingPower::More(val))
    }
}

impl BindingPower {
    pub fn val(&self) -> u32 {
        match self {
            BindingPower::More(val) => *val,
            level => LEVELS.iter().position(|l| l == level).unwrap_or_default() as u32,
        }
    }
}

impl Add for BindingPower {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let sum_val = self.val() + rhs.val();
        BindingPower::from(sum_val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(BindingPower::Term < BindingPower::Factor);
        assert!(BindingPower::Assignment < BindingPower::LogicalOr);
        assert_eq!(BindingPower::Term + BindingPower::from(1), BindingPower::Factor);
        assert_eq!(BindingPower::Primary + BindingPower::from(1), BindingPower::More(15));
    }
}
