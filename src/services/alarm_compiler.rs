//! 闹钟按键计划编译器 - 业务能力层
//!
//! 把声明式的 `AlarmSpec` 翻译成按焦点顺序排列的按键序列。
//! 纯函数，不做任何 I/O；所有条件分支都在编译期决定。

use crate::error::ConfigError;
use crate::models::alarm::{snooze_index, sound_index, DEFAULT_SNOOZE};
use crate::models::{AlarmSpec, KeyEvent, NavigationPlan};

/// 闹钟编辑器中星期开关的数量
const WEEKDAY_TOGGLES: u8 = 7;

/// 按键计划编译器
///
/// 编辑器的焦点顺序假定为：
/// 小时 → 分钟 → 名称 → 重复开关 → 星期开关(周日..周六) → 铃声 → 贪睡 → 保存
#[derive(Debug, Default, Clone, Copy)]
pub struct AlarmPlanCompiler;

impl AlarmPlanCompiler {
    pub fn new() -> Self {
        Self
    }

    /// 编译闹钟为按键计划
    ///
    /// 所有校验在生成第一个按键之前完成，失败时不会产生部分计划。
    pub fn compile(&self, spec: &AlarmSpec) -> Result<NavigationPlan, ConfigError> {
        let resolved = Resolved::from_spec(spec)?;
        let mut events = Vec::new();

        // 1-2. 时间
        push_two_digits(&mut events, spec.hour);
        events.push(KeyEvent::Tab);
        push_two_digits(&mut events, spec.minute);
        events.push(KeyEvent::Tab);

        // 3. 名称
        if !spec.label.is_empty() {
            events.push(KeyEvent::Text(spec.label.clone()));
        }
        events.push(KeyEvent::Tab);

        // 4. 重复开关：先切换再移动
        if spec.repeat {
            events.push(KeyEvent::Space);
        }
        events.push(KeyEvent::Tab);

        // 5. 星期开关，无论是否选中都右移
        for ordinal in 1..=WEEKDAY_TOGGLES {
            if spec.weekdays.contains(&ordinal) {
                events.push(KeyEvent::Space);
            }
            events.push(KeyEvent::Right);
        }

        // 6. 铃声
        match resolved.sound {
            Some(index) => {
                events.push(KeyEvent::Tab);
                events.extend(std::iter::repeat(KeyEvent::Down).take(index));
                events.push(KeyEvent::Tab);
            }
            None => {
                events.push(KeyEvent::Tab);
                events.push(KeyEvent::Tab);
            }
        }

        // 7. 贪睡：相对默认选中项移动
        let offset = resolved.snooze_offset;
        let step = if offset > 0 { KeyEvent::Down } else { KeyEvent::Up };
        events.extend(std::iter::repeat(step).take(offset.unsigned_abs()));
        events.push(KeyEvent::Tab);

        // 8. 保存
        events.push(KeyEvent::Space);

        Ok(NavigationPlan::new(events))
    }
}

/// 校验并解析后的枚举位置
struct Resolved {
    sound: Option<usize>,
    snooze_offset: isize,
}

impl Resolved {
    fn from_spec(spec: &AlarmSpec) -> Result<Self, ConfigError> {
        if spec.hour > 23 {
            return Err(ConfigError::HourOutOfRange(spec.hour));
        }
        if spec.minute > 59 {
            return Err(ConfigError::MinuteOutOfRange(spec.minute));
        }
        if let Some(day) = spec
            .weekdays
            .iter()
            .find(|d| !(1..=WEEKDAY_TOGGLES).contains(*d))
        {
            return Err(ConfigError::WeekdayOutOfRange(*day));
        }

        let sound = spec.sound.as_deref().map(sound_index).transpose()?;
        let snooze = snooze_index(&spec.snooze)? as isize;
        let baseline = snooze_index(DEFAULT_SNOOZE)? as isize;

        Ok(Self {
            sound,
            snooze_offset: snooze - baseline,
        })
    }
}

fn push_two_digits(events: &mut Vec<KeyEvent>, value: u8) {
    events.push(KeyEvent::Digit(value / 10));
    events.push(KeyEvent::Digit(value % 10));
}
