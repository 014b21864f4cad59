//! Token kind registry.
//!
//! [`TokenKind`] is a closed, `#[repr(u8)]` enumeration of every token the
//! scanner can produce. The variant list, stable display names, and fixed
//! lexemes are declared once in the `token_kinds!` table below so the three
//! can never drift apart.

use std::fmt;

macro_rules! token_kinds {
    (@lexeme $lexeme:literal) => {
        Some($lexeme.as_bytes())
    };
    (@lexeme) => {
        None
    };
    ($( $(#[$meta:meta])* $variant:ident = $name:literal $(=> $lexeme:literal)? ),* $(,)?) => {
        /// Classification of a scanned token.
        ///
        /// Discriminants are contiguous from zero in declaration order, which
        /// [`TokenKind::from_u8`] relies on.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum TokenKind {
            $( $(#[$meta])* $variant, )*
        }

        impl TokenKind {
            /// Every kind, in discriminant order.
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant),*];

            /// Stable `SCREAMING_CASE` name used by diagnostics and the CLI.
            pub const fn name(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $name,)*
                }
            }

            /// The exact bytes of kinds that only ever have one spelling.
            pub const fn lexeme(self) -> Option<&'static [u8]> {
                match self {
                    $(TokenKind::$variant => token_kinds!(@lexeme $($lexeme)?),)*
                }
            }
        }
    };
}

token_kinds! {
    // Punctuation
    OpenParen = "OPEN_PAREN" => "(",
    CloseParen = "CLOSE_PAREN" => ")",
    OpenBracket = "OPEN_BRACKET" => "[",
    CloseBracket = "CLOSE_BRACKET" => "]",
    OpenCurly = "OPEN_CURLY" => "{",
    CloseCurly = "CLOSE_CURLY" => "}",
    Comma = "COMMA" => ",",
    Dot = "DOT" => ".",
    Colon = "COLON" => ":",
    Semicolon = "SEMICOLON" => ";",
    QuestionMark = "QUESTION_MARK" => "?",

    // Equality and assignment
    Equal = "EQUAL" => "=",
    EqualEqual = "EQUAL_EQUAL" => "==",
    EqualEqualEqual = "EQUAL_EQUAL_EQUAL" => "===",
    Not = "NOT" => "!",
    NotEqual = "NOT_EQUAL" => "!=",
    NotEqualEqual = "NOT_EQUAL_EQUAL" => "!==",
    FatArrow = "FAT_ARROW" => "=>",

    // Arithmetic
    Add = "ADD" => "+",
    Increment = "INCREMENT" => "++",
    PlusEqual = "PLUS_EQUAL" => "+=",
    Subtract = "SUBTRACT" => "-",
    Decrement = "DECREMENT" => "--",
    MinusEqual = "MINUS_EQUAL" => "-=",
    Multiply = "MULTIPLY" => "*",
    MultiplyAssign = "MULTIPLY_ASSIGN" => "*=",
    Exponent = "EXPONENT" => "**",
    ExponentAssign = "EXPONENT_ASSIGN" => "**=",
    Divide = "DIVIDE" => "/",
    DivideAssign = "DIVIDE_ASSIGN" => "/=",
    Mod = "MOD" => "%",
    ModEqual = "MOD_EQUAL" => "%=",

    // Bitwise and logical
    BitwiseAnd = "BITWISE_AND" => "&",
    BitwiseAndAssign = "BITWISE_AND_ASSIGN" => "&=",
    LogicalAnd = "LOGICAL_AND" => "&&",
    BitwiseOr = "BITWISE_OR" => "|",
    BitwiseOrAssign = "BITWISE_OR_ASSIGN" => "|=",
    LogicalOr = "LOGICAL_OR" => "||",
    BitwiseXor = "BITWISE_XOR" => "^",
    BitwiseXorAssign = "BITWISE_XOR_ASSIGN" => "^=",
    BitwiseNot = "BITWISE_NOT" => "~",
    NullCoalescing = "NULL_COALESCING" => "??",

    // Comparison and shifts
    LessThan = "LESS_THAN" => "<",
    LessThanOrEqual = "LESS_THAN_OR_EQUAL" => "<=",
    BitshiftLeft = "BITSHIFT_LEFT" => "<<",
    BitshiftLeftAssign = "BITSHIFT_LEFT_ASSIGN" => "<<=",
    GreaterThan = "GREATER_THAN" => ">",
    GreaterThanOrEqual = "GREATER_THAN_OR_EQUAL" => ">=",
    SignedBitshiftRight = "SIGNED_BITSHIFT_RIGHT" => ">>",
    BitshiftRightAssign = "BITSHIFT_RIGHT_ASSIGN" => ">>=",
    ZeroFillRightShift = "ZERO_FILL_RIGHT_SHIFT" => ">>>",
    ZeroFillRightShiftAssign = "ZERO_FILL_RIGHT_SHIFT_ASSIGN" => ">>>=",

    // Literals
    Numeric = "NUMERIC",
    DoubleQuoteString = "DOUBLE_QUOTE_STRING",
    SingleQuoteString = "SINGLE_QUOTE_STRING",
    /// Backtick string; interpolations are not parsed.
    TemplateString = "TEMPLATE_STRING",
    Regex = "REGEX",

    // Keywords
    Var = "VAR" => "var",
    Let = "LET" => "let",
    Const = "CONST" => "const",
    For = "FOR" => "for",
    Function = "FUNCTION" => "function",
    Return = "RETURN" => "return",
    Catch = "CATCH" => "catch",
    If = "IF" => "if",
    Else = "ELSE" => "else",
    Do = "DO" => "do",
    While = "WHILE" => "while",
    Throw = "THROW" => "throw",
    Typeof = "TYPEOF" => "typeof",
    Identifier = "IDENTIFIER",

    // Whitespace and comments
    /// A run of one or more spaces.
    Space = "SPACE",
    /// A run of one or more tabs.
    Tab = "TAB",
    Newline = "NEWLINE" => "\n",
    CarriageReturn = "CARRIAGE_RETURN" => "\r",
    LineComment = "LINE_COMMENT",
    MultiLineComment = "MULTI_LINE_COMMENT",

    // Structural
    /// A single byte the scanner does not recognise.
    Error = "ERROR",
    Eof = "EOF",
}

impl TokenKind {
    /// Look up a kind by its discriminant.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Classify an identifier run as a keyword, if it is one.
    pub fn keyword(ident: &[u8]) -> Option<Self> {
        let kind = match ident {
            b"var" => Self::Var,
            b"let" => Self::Let,
            b"const" => Self::Const,
            b"for" => Self::For,
            b"function" => Self::Function,
            b"return" => Self::Return,
            b"catch" => Self::Catch,
            b"if" => Self::If,
            b"else" => Self::Else,
            b"do" => Self::Do,
            b"while" => Self::While,
            b"throw" => Self::Throw,
            b"typeof" => Self::Typeof,
            _ => return None,
        };
        Some(kind)
    }

    /// Spaces, tabs, newlines and carriage returns.
    pub fn is_whitespace(self) -> bool {
        matches!(
            self,
            Self::Space | Self::Tab | Self::Newline | Self::CarriageReturn
        )
    }

    /// Anything that is not whitespace.
    pub fn is_significant(self) -> bool {
        !self.is_whitespace()
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Var
                | Self::Let
                | Self::Const
                | Self::For
                | Self::Function
                | Self::Return
                | Self::Catch
                | Self::If
                | Self::Else
                | Self::Do
                | Self::While
                | Self::Throw
                | Self::Typeof
        )
    }

    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::DoubleQuoteString | Self::SingleQuoteString | Self::TemplateString
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::MultiLineComment)
    }

    /// Kinds an operator may be spaced against without doubling up.
    pub fn is_value_like(self) -> bool {
        matches!(
            self,
            Self::CloseParen
                | Self::CloseCurly
                | Self::CloseBracket
                | Self::Numeric
                | Self::Identifier
                | Self::Regex
                | Self::MultiLineComment
        ) || self.is_string()
    }

    /// Kinds after which `/` is division rather than a regex.
    pub fn produces_value(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::Numeric | Self::CloseParen | Self::CloseBracket
        )
    }

    /// Binary, comparison and assignment operators, which the line
    /// assembler surrounds with single spaces.
    pub fn is_spaced_operator(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::EqualEqual
                | Self::EqualEqualEqual
                | Self::NotEqual
                | Self::NotEqualEqual
                | Self::FatArrow
                | Self::Add
                | Self::PlusEqual
                | Self::Subtract
                | Self::MinusEqual
                | Self::Multiply
                | Self::MultiplyAssign
                | Self::Exponent
                | Self::ExponentAssign
                | Self::Divide
                | Self::DivideAssign
                | Self::Mod
                | Self::ModEqual
                | Self::BitwiseAnd
                | Self::BitwiseAndAssign
                | Self::LogicalAnd
                | Self::BitwiseOr
                | Self::BitwiseOrAssign
                | Self::LogicalOr
                | Self::BitwiseXor
                | Self::BitwiseXorAssign
                | Self::NullCoalescing
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::BitshiftLeft
                | Self::BitshiftLeftAssign
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
                | Self::SignedBitshiftRight
                | Self::BitshiftRightAssign
                | Self::ZeroFillRightShift
                | Self::ZeroFillRightShiftAssign
        )
    }

    /// `+` and `-`, which read as unary signs after a non-value.
    pub fn is_sign(self) -> bool {
        matches!(self, Self::Add | Self::Subtract)
    }

    /// Short-circuiting boolean operators.
    pub fn is_logic(self) -> bool {
        matches!(
            self,
            Self::LogicalAnd | Self::LogicalOr | Self::NullCoalescing
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
