use std::fmt;

/// Named stages of a wizard run, reported to telemetry as the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Start,
    GatherInputs,
    ResolveRepository,
    SelectTemplate,
    ResolveTarget,
    ResolveProject,
    CreatePrerequisites,
    CheckIn,
    CreateAndQueue,
    PostSteps,
    Display,
    Done,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Start => "Start",
            WizardStep::GatherInputs => "GatherInputs",
            WizardStep::ResolveRepository => "ResolveRepository",
            WizardStep::SelectTemplate => "SelectTemplate",
            WizardStep::ResolveTarget => "ResolveTarget",
            WizardStep::ResolveProject => "ResolveProject",
            WizardStep::CreatePrerequisites => "CreatePrerequisites",
            WizardStep::CheckIn => "CheckIn",
            WizardStep::CreateAndQueue => "CreateAndQueue",
            WizardStep::PostSteps => "PostSteps",
            WizardStep::Display => "Display",
            WizardStep::Done => "Done",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
