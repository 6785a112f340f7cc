use std::fmt;

/// 单个逻辑按键
///
/// 生成后不可变；`Text` 中的空格在发送时编码为 `{SPACE}`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Space,
    Digit(u8),
    Text(String),
}

impl KeyEvent {
    /// 转换为按键序列语法（`{TAB}`、`{SPACE}` 等）
    pub fn to_send_keys(&self) -> String {
        match self {
            KeyEvent::Up => "{UP}".to_string(),
            KeyEvent::Down => "{DOWN}".to_string(),
            KeyEvent::Left => "{LEFT}".to_string(),
            KeyEvent::Right => "{RIGHT}".to_string(),
            KeyEvent::Tab => "{TAB}".to_string(),
            KeyEvent::Space => "{SPACE}".to_string(),
            KeyEvent::Digit(d) => d.to_string(),
            KeyEvent::Text(text) => encode_text(text),
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_send_keys())
    }
}

// 控件不接受字面空格；修饰符与括号需要用花括号转义
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => out.push_str("{SPACE}"),
            '{' | '}' | '(' | ')' | '+' | '^' | '%' | '~' | '[' | ']' => {
                out.push('{');
                out.push(c);
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}

/// 预先解析好的按键序列，从左到右只消费一次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPlan {
    events: Vec<KeyEvent>,
}

impl NavigationPlan {
    pub fn new(events: Vec<KeyEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, event: &KeyEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn into_events(self) -> Vec<KeyEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_encodes_spaces_and_specials() {
        let event = KeyEvent::Text("Tenha um dia (bom)!".into());
        assert_eq!(
            event.to_send_keys(),
            "Tenha{SPACE}um{SPACE}dia{SPACE}{(}bom{)}!"
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(KeyEvent::Tab.to_send_keys(), "{TAB}");
        assert_eq!(KeyEvent::Digit(7).to_send_keys(), "7");
    }
}
