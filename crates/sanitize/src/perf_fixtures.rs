pub const MESSAGE_TEMPLATE: &str = "<div style=\"color: red; top: 0\">\
<a href=\"http://example.com/\" title=\"link\">hello</a> plain &amp; text \
<em>with emphasis</em><blockquote>an earlier quoted reply</blockquote>\
<script>var x = 1;</script></div>";

pub fn make_message(blocks: usize) -> String {
    let mut html = String::with_capacity(MESSAGE_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        html.push_str(MESSAGE_TEMPLATE);
    }
    html
}
