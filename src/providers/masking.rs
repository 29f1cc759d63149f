//! # 密钥脱敏

/// 脱敏显示的最大可见字符数
pub const MAX_VISIBLE_CHARS: usize = 4;

const MASK_CHAR: char = '*';

/// 对明文密钥进行脱敏
///
/// 只保留末尾 `min(4, n / 3)` 个字符，其余每个字符替换为 `*`，
/// 因此输出长度与原文字符数一致。长度不足 3 的密钥完全隐藏。
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let total = secret.chars().count();
    let visible = MAX_VISIBLE_CHARS.min(total / 3);
    let hidden = total - visible;

    secret
        .chars()
        .enumerate()
        .map(|(index, c)| if index < hidden { MASK_CHAR } else { c })
        .collect()
}
