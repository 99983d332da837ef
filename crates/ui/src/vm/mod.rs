mod attempt_vm;
mod result_vm;
mod time_fmt;

pub use attempt_vm::{
    OptionVm, PaletteEntryVm, QuestionVm, SummaryVm, map_palette, map_question, map_summary,
    status_class,
};
pub use result_vm::{
    HistoryEntryVm, ResultVm, SolutionEntryVm, map_history, map_result, map_solution,
};
pub use time_fmt::{format_clock, format_datetime};
