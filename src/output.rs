/// Line buffer that prefixes every pushed line with the current indentation.
pub struct Output {
    lines: Vec<String>,
    indent_level: usize,
    indent_string: String,
}

impl Output {
    pub fn new(indent_string: String) -> Self {
        Self {
            lines: Vec::new(),
            indent_level: 0,
            indent_string,
        }
    }

    pub fn add_line(&mut self, text: &str) {
        let mut line = self.get_indent();
        line.push_str(text);
        self.lines.push(line);
    }

    pub fn add_raw_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    pub fn add_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn remove_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub const fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn get_indent(&self) -> String {
        self.indent_string.repeat(self.indent_level)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn into_string(self) -> String {
        self.lines.join("\n")
    }
}
