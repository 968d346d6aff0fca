/// Border character set for the menu frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    pub t_left: char,
    pub t_right: char,
}

/// Rounded Unicode borders, used whenever the locale advertises UTF-8.
pub const BORDER_UNICODE: BorderSet = BorderSet {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
    t_left: '├',
    t_right: '┤',
};

/// Pure-ASCII fallback: slash corners, dash/pipe edges.
pub const BORDER_ASCII: BorderSet = BorderSet {
    top_left: '/',
    top_right: '\\',
    bottom_left: '\\',
    bottom_right: '/',
    horizontal: '-',
    vertical: '|',
    t_left: '+',
    t_right: '+',
};

impl BorderSet {
    pub fn for_unicode(unicode: bool) -> &'static BorderSet {
        if unicode {
            &BORDER_UNICODE
        } else {
            &BORDER_ASCII
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_set_is_really_ascii() {
        let set = BORDER_ASCII;
        for ch in [
            set.top_left,
            set.top_right,
            set.bottom_left,
            set.bottom_right,
            set.horizontal,
            set.vertical,
            set.t_left,
            set.t_right,
        ] {
            assert!(ch.is_ascii(), "{ch:?} must be ASCII");
        }
    }

    #[test]
    fn selection_follows_unicode_flag() {
        assert_eq!(BorderSet::for_unicode(true), &BORDER_UNICODE);
        assert_eq!(BorderSet::for_unicode(false), &BORDER_ASCII);
    }
}
