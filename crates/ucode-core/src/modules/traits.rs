use crate::domain::{TaskArtifact, TaskRequest, TaskResult};

pub trait TaskExecutor {
    fn execute(&self, request: &TaskRequest) -> TaskResult<Vec<TaskArtifact>>;
}

#[cfg(test)]
mod tests {
    use super::TaskExecutor;
    use crate::domain::{
        TaskArtifact, TaskRequest, UcodeError, UcodeErrorCategory, WorkflowTask,
    };

    struct FailingExecutor;

    impl TaskExecutor for FailingExecutor {
        fn execute(
            &self,
            _request: &TaskRequest,
        ) -> crate::domain::TaskResult<Vec<TaskArtifact>> {
            Err(UcodeError::computation("RUN.TASK", "task execution failed"))
        }
    }

    #[test]
    fn task_executor_uses_shared_error_types() {
        let request = TaskRequest::new(WorkflowTask::Parallel, "out");
        let error = FailingExecutor
            .execute(&request)
            .expect_err("executor should fail");
        assert_eq!(error.category(), UcodeErrorCategory::Computation);
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.placeholder(), "RUN.TASK");
    }
}
