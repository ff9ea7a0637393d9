#![no_main]

use libfuzzer_sys::fuzz_target;

use markup::{SinkResult, Token, TokenSink};

#[derive(Default)]
struct Count {
    opens: usize,
    closes: usize,
}

impl TokenSink for Count {
    fn process(&mut self, token: Token) -> SinkResult {
        match token {
            Token::StartTag { self_closing, .. } => {
                if !self_closing {
                    self.opens += 1;
                }
            }
            Token::EndTag(_) => self.closes += 1,
            Token::Text(_) | Token::Comment(_) => {}
        }
        SinkResult::Continue
    }
}

fuzz_target!(|input: &str| {
    // The scan must terminate on any input, never panic, and close every
    // element it opened by end of input.
    let mut sink = Count::default();
    let result = markup::tokenize(input, &mut sink);
    assert_eq!(result, SinkResult::Continue);
    assert_eq!(sink.opens, sink.closes);
});
