use roman_calculator::{Reply, Session, lex::ErrorKind};

fn assert_result(session: &mut Session, line: &str, roman: &str) {
    match session.process(line) {
        Reply::Value { value, .. } => assert_eq!(value.to_string(), roman, "line `{line}`"),
        reply => panic!("line `{line}` gave `{reply}` instead of {roman}"),
    }
}

fn assert_error(session: &mut Session, line: &str, kind: ErrorKind) {
    match session.process(line) {
        Reply::Error(e) => assert_eq!(e.kind, kind, "line `{line}`: {e}"),
        reply => panic!("line `{line}` gave `{reply}` instead of an error"),
    }
}

fn fresh(line: &str, roman: &str) {
    assert_result(&mut Session::new(), line, roman);
}

#[test]
fn no_operator_precedence() {
    fresh("II + III * II", "X");
    fresh("ii*(iii+ii)", "X");
    fresh("I + II * III - IV / V", "I");
}

#[test]
fn division_and_exponent() {
    fresh("VII / II", "III");
    fresh("II ** III", "VIII");
    fresh("O - II", "-II");
    fresh("(O - III) ** III", "-XXVII");
    assert_error(&mut Session::new(), "VI / O", ErrorKind::DivisionByZero);
}

#[test]
fn range_limits() {
    fresh("MMMCMXCIX", "MMMCMXCIX");
    fresh("O - MMMCMXCIX", "-MMMCMXCIX");
    fresh("MMMCMXCIX - MMMCMXCIX", "O");
    assert_error(&mut Session::new(), "MMMCMXCIX + I", ErrorKind::ResultOutOfRange);
    assert_error(&mut Session::new(), "O - MMMCMXCIX - I", ErrorKind::ResultOutOfRange);
}

#[test]
fn trailing_equals_is_ignored() {
    fresh("X + X =", "XX");
    fresh("X + X=", "XX");
    assert!(matches!(Session::new().process("="), Reply::Prompt));
}

#[test]
fn continuation_uses_previous_result() {
    let mut session = Session::new();
    assert_result(&mut session, "+ III", "III");
    assert_result(&mut session, "+ II", "V");

    let reply = session.process("+ III");
    assert!(matches!(
        reply,
        Reply::Value {
            uses_previous: true,
            ..
        }
    ));
    assert_eq!(
        reply.to_string(),
        "Result (which uses previous line's result): Roman VIII (Arabic 8)."
    );

    // A leading operand starts over.
    assert_result(&mut session, "IV", "IV");
    assert_result(&mut session, "* (II + I)", "XII");
    assert_error(&mut session, "(+ I)", ErrorKind::InvalidExpression);
    assert_eq!(session.previous().value(), 12);
}

#[test]
fn malformed_literals_are_rejected() {
    let mut session = Session::new();
    assert_error(&mut session, "VV", ErrorKind::InvalidCharacter);
    assert_error(&mut session, "IIII + I", ErrorKind::InvalidCharacter);
    assert_error(&mut session, "IM", ErrorKind::InvalidCharacter);
    assert_error(&mut session, "OX", ErrorKind::InvalidCharacter);
    assert_error(&mut session, "II I", ErrorKind::MissingOperator);
    assert_error(&mut session, "X % II", ErrorKind::InvalidCharacter);
    assert_result(&mut session, "III", "III");
}

#[test]
fn error_messages_point_at_the_fault() {
    let mut session = Session::new();
    let cases = [
        ("xx ** (", "There's a missing expression detected at the end of this text: XX ** ( "),
        ("X + ", "There's a missing operand detected at the end of this text: X + "),
        ("(X + I", "There's an incomplete expression detected at the end of this text: (X + I "),
        ("X + V) - I", "There's an incomplete expression detected at the end of this text: X + V)"),
        ("V (I)", "There's a missing operator detected at the end of this text: V ("),
        ("XIVI", "There's an invalid character detected at the end of this text: XIVI"),
    ];
    for (line, message) in cases {
        assert_eq!(session.process(line).to_string(), message, "line `{line}`");
    }
}

#[test]
fn shell_directives() {
    let mut session = Session::new();
    assert!(matches!(session.process("   "), Reply::Prompt));
    assert!(matches!(session.process("X + 10"), Reply::DigitZero));
    assert!(matches!(session.process("Quit"), Reply::Quit));
    assert!(matches!(session.process("exit please"), Reply::Quit));
}
