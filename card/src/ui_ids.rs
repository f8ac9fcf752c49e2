pub const UI_YES: u32 = 101;
pub const UI_NO: u32 = 102;
