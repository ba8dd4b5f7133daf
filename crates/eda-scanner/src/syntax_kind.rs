//! Token kinds produced by the scanner.
//!
//! Node kinds that never appear as tokens live in the parser's
//! `syntax_kind_ext` module and start above `SyntaxKind::Count`.

use serde::Serialize;

/// Token kinds. The discriminant doubles as the `kind` stored in AST nodes
/// for token-shaped nodes (identifiers, literals, keywords).
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,
    // Trivia
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,
    NewLineTrivia,
    WhitespaceTrivia,
    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,
    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    QuestionQuestionToken,
    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    BarBarEqualsToken,
    AmpersandAmpersandEqualsToken,
    QuestionQuestionEqualsToken,
    // Identifiers
    Identifier,
    PrivateIdentifier,
    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,
    // Contextual keywords
    AsKeyword,
    AsyncKeyword,
    AwaitKeyword,
    FromKeyword,
    GetKeyword,
    LetKeyword,
    OfKeyword,
    SetKeyword,
    StaticKeyword,
    YieldKeyword,
    /// Marker; node kinds in `syntax_kind_ext` start above this value.
    Count,
}

impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::YieldKeyword;
    pub const FIRST_RESERVED_WORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::WithKeyword;
    pub const FIRST_CONTEXTUAL_KEYWORD: SyntaxKind = SyntaxKind::AsKeyword;
    pub const FIRST_TEMPLATE_TOKEN: SyntaxKind = SyntaxKind::NoSubstitutionTemplateLiteral;
    pub const LAST_TEMPLATE_TOKEN: SyntaxKind = SyntaxKind::TemplateTail;

    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        (first as u16..=last as u16).contains(&(self as u16))
    }
}

/// Ordered keyword table; the index matches the keyword's offset from
/// `SyntaxKind::FIRST_KEYWORD`.
const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("break", SyntaxKind::BreakKeyword),
    ("case", SyntaxKind::CaseKeyword),
    ("catch", SyntaxKind::CatchKeyword),
    ("class", SyntaxKind::ClassKeyword),
    ("const", SyntaxKind::ConstKeyword),
    ("continue", SyntaxKind::ContinueKeyword),
    ("debugger", SyntaxKind::DebuggerKeyword),
    ("default", SyntaxKind::DefaultKeyword),
    ("delete", SyntaxKind::DeleteKeyword),
    ("do", SyntaxKind::DoKeyword),
    ("else", SyntaxKind::ElseKeyword),
    ("enum", SyntaxKind::EnumKeyword),
    ("export", SyntaxKind::ExportKeyword),
    ("extends", SyntaxKind::ExtendsKeyword),
    ("false", SyntaxKind::FalseKeyword),
    ("finally", SyntaxKind::FinallyKeyword),
    ("for", SyntaxKind::ForKeyword),
    ("function", SyntaxKind::FunctionKeyword),
    ("if", SyntaxKind::IfKeyword),
    ("import", SyntaxKind::ImportKeyword),
    ("in", SyntaxKind::InKeyword),
    ("instanceof", SyntaxKind::InstanceOfKeyword),
    ("new", SyntaxKind::NewKeyword),
    ("null", SyntaxKind::NullKeyword),
    ("return", SyntaxKind::ReturnKeyword),
    ("super", SyntaxKind::SuperKeyword),
    ("switch", SyntaxKind::SwitchKeyword),
    ("this", SyntaxKind::ThisKeyword),
    ("throw", SyntaxKind::ThrowKeyword),
    ("true", SyntaxKind::TrueKeyword),
    ("try", SyntaxKind::TryKeyword),
    ("typeof", SyntaxKind::TypeOfKeyword),
    ("var", SyntaxKind::VarKeyword),
    ("void", SyntaxKind::VoidKeyword),
    ("while", SyntaxKind::WhileKeyword),
    ("with", SyntaxKind::WithKeyword),
    ("as", SyntaxKind::AsKeyword),
    ("async", SyntaxKind::AsyncKeyword),
    ("await", SyntaxKind::AwaitKeyword),
    ("from", SyntaxKind::FromKeyword),
    ("get", SyntaxKind::GetKeyword),
    ("let", SyntaxKind::LetKeyword),
    ("of", SyntaxKind::OfKeyword),
    ("set", SyntaxKind::SetKeyword),
    ("static", SyntaxKind::StaticKeyword),
    ("yield", SyntaxKind::YieldKeyword),
];

pub(crate) const PUNCTUATION: &[(&str, SyntaxKind)] = &[
    ("{", SyntaxKind::OpenBraceToken),
    ("}", SyntaxKind::CloseBraceToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    (".", SyntaxKind::DotToken),
    ("...", SyntaxKind::DotDotDotToken),
    (";", SyntaxKind::SemicolonToken),
    (",", SyntaxKind::CommaToken),
    ("?.", SyntaxKind::QuestionDotToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    (">=", SyntaxKind::GreaterThanEqualsToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("===", SyntaxKind::EqualsEqualsEqualsToken),
    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
    ("=>", SyntaxKind::EqualsGreaterThanToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("/", SyntaxKind::SlashToken),
    ("%", SyntaxKind::PercentToken),
    ("++", SyntaxKind::PlusPlusToken),
    ("--", SyntaxKind::MinusMinusToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    (">>", SyntaxKind::GreaterThanGreaterThanToken),
    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("!", SyntaxKind::ExclamationToken),
    ("~", SyntaxKind::TildeToken),
    ("&&", SyntaxKind::AmpersandAmpersandToken),
    ("||", SyntaxKind::BarBarToken),
    ("?", SyntaxKind::QuestionToken),
    (":", SyntaxKind::ColonToken),
    ("??", SyntaxKind::QuestionQuestionToken),
    ("=", SyntaxKind::EqualsToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("/=", SyntaxKind::SlashEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("||=", SyntaxKind::BarBarEqualsToken),
    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
    ("??=", SyntaxKind::QuestionQuestionEqualsToken),
];

/// Look up the keyword kind for an identifier text.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == text)
        .map(|(_, kind)| *kind)
}

/// Get the source text of a keyword token.
pub fn keyword_to_text(kind: SyntaxKind) -> Option<&'static str> {
    if !token_is_keyword(kind) {
        return None;
    }
    KEYWORDS
        .get((kind as u16 - SyntaxKind::FIRST_KEYWORD as u16) as usize)
        .map(|(text, _)| *text)
}

/// Get the source text of a punctuation token.
pub fn punctuation_to_text(kind: SyntaxKind) -> Option<&'static str> {
    PUNCTUATION
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(text, _)| *text)
}

pub fn token_is_keyword(kind: SyntaxKind) -> bool {
    kind.in_range(SyntaxKind::FIRST_KEYWORD, SyntaxKind::LAST_KEYWORD)
}

pub fn token_is_reserved_word(kind: SyntaxKind) -> bool {
    kind.in_range(
        SyntaxKind::FIRST_RESERVED_WORD,
        SyntaxKind::LAST_RESERVED_WORD,
    )
}

pub fn token_is_contextual_keyword(kind: SyntaxKind) -> bool {
    kind.in_range(SyntaxKind::FIRST_CONTEXTUAL_KEYWORD, SyntaxKind::LAST_KEYWORD)
}

pub fn token_is_identifier_or_keyword(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || token_is_keyword(kind)
}

pub fn token_is_punctuation(kind: SyntaxKind) -> bool {
    kind.in_range(SyntaxKind::FIRST_PUNCTUATION, SyntaxKind::LAST_PUNCTUATION)
}

pub fn token_is_assignment_operator(kind: SyntaxKind) -> bool {
    kind.in_range(SyntaxKind::FIRST_ASSIGNMENT, SyntaxKind::LAST_ASSIGNMENT)
}

pub fn token_is_template_literal(kind: SyntaxKind) -> bool {
    kind.in_range(
        SyntaxKind::FIRST_TEMPLATE_TOKEN,
        SyntaxKind::LAST_TEMPLATE_TOKEN,
    )
}

pub fn token_is_trivia(kind: SyntaxKind) -> bool {
    kind.in_range(
        SyntaxKind::SingleLineCommentTrivia,
        SyntaxKind::WhitespaceTrivia,
    )
}
