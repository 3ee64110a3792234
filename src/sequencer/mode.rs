use crate::audio::SampleId;

use super::pattern::FillId;

// Which multi-key gesture is in progress, with whatever it has picked so far.
// Space always lands back on Default.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CommandMode {
    #[default]
    Default,
    SelectingFillSample,
    SelectingFillSlot { sample: SampleId },
    SelectingFillInterval { sample: SampleId, fill: FillId, entered: Option<u32> },
    SelectingPatternSample,
    SelectingPatternSteps { sample: SampleId },
    SelectingRemovalSteps,
}

impl CommandMode {
    pub fn prompt(&self) -> String {
        match self {
            CommandMode::Default => String::new(),
            CommandMode::SelectingFillSample => "fill: pick a tap sample".into(),
            CommandMode::SelectingFillSlot { sample } => format!("fill: {sample} -> [;] or [']"),
            CommandMode::SelectingFillInterval { sample, fill, entered } => {
                let n = match fill {
                    FillId::Fill1 => 1,
                    FillId::Fill2 => 2,
                };
                match entered {
                    Some(v) => format!("fill{n}: {sample} every {v}_ steps [enter]"),
                    None => format!("fill{n}: {sample} every __ steps"),
                }
            }
            CommandMode::SelectingPatternSample => "add: pick a tap sample".into(),
            CommandMode::SelectingPatternSteps { sample } => format!("add: {sample} -> steps"),
            CommandMode::SelectingRemovalSteps => "delete: pick steps".into(),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, CommandMode::Default)
    }
}
