//! Event-stream invariants over adversarial inputs.
//!
//! Whatever the input looks like, the delivered events must nest: every end
//! tag closes exactly the innermost open element, and nothing stays open
//! once the scan finishes. Running the corpus at all also exercises the
//! termination guarantee.

use markup::{SinkResult, Token, TokenSink, tokenize};

#[derive(Default)]
struct Balance {
    open: Vec<String>,
    violations: Vec<String>,
}

impl TokenSink for Balance {
    fn process(&mut self, token: Token) -> SinkResult {
        match token {
            Token::StartTag {
                name, self_closing, ..
            } => {
                if !self_closing {
                    self.open.push(name);
                }
            }
            Token::EndTag(name) => match self.open.pop() {
                Some(top) if top == name => {}
                other => self
                    .violations
                    .push(format!("</{name}> closed {other:?}")),
            },
            Token::Text(_) | Token::Comment(_) => {}
        }
        SinkResult::Continue
    }
}

const ADVERSARIAL: &[&str] = &[
    "",
    "<",
    "<<<<<<",
    "plain text only",
    "<div><span><b>deep</div>",
    "</div></div></div>",
    "<p><p><p><p>",
    "<ul><li>a<li>b<li>c",
    "<table><tr><td>x<td>y<tr><td>z",
    "<b>bold<div>block</b></div>",
    "<script>var a = '</div>';",
    "<style>p { content: \"<b>\"; }",
    "<script><script><script>",
    "<a href=\"unterminated",
    "<a href='mixed\">quotes'>x</a>",
    "<em CLASS=>broken",
    "<!-- unterminated comment",
    "<!---->",
    "<!--x--><!--y-->",
    "<img><br><hr><input>",
    "<span/><span/><span/>",
    "<ns:div><other:span>x</other:span></ns:div>",
    "text with \u{0} nul and \r\n line breaks",
    "\u{1f600}<b>\u{e9}\u{e8}\u{ea}</b>\u{1f600}",
    "<3 <4 <5 <>",
    "<p a=>not a tag",
    "< div>leading space",
    "</  >",
    "<div append=\"a\\\">weird</div>",
];

#[test]
fn every_end_tag_closes_the_innermost_open_element() {
    for input in ADVERSARIAL {
        let mut sink = Balance::default();
        let result = tokenize(input, &mut sink);
        assert_eq!(result, SinkResult::Continue, "input: {input:?}");
        assert!(
            sink.violations.is_empty(),
            "input: {input:?}, violations: {:?}",
            sink.violations
        );
        assert!(
            sink.open.is_empty(),
            "input: {input:?}, left open: {:?}",
            sink.open
        );
    }
}

#[test]
fn deep_nesting_terminates_and_balances() {
    let mut input = String::new();
    for _ in 0..2_000 {
        input.push_str("<div><span>");
    }
    input.push('x');
    let mut sink = Balance::default();
    tokenize(&input, &mut sink);
    assert!(sink.violations.is_empty(), "{:?}", sink.violations);
    assert!(sink.open.is_empty());
}

#[test]
fn repeated_blocks_with_noise_balance() {
    let mut input = String::new();
    for i in 0..500 {
        input.push_str("<p class=x>para ");
        input.push_str(&i.to_string());
        input.push_str(" < not a tag </p >");
    }
    let mut sink = Balance::default();
    tokenize(&input, &mut sink);
    assert!(sink.violations.is_empty(), "{:?}", sink.violations);
    assert!(sink.open.is_empty());
}
