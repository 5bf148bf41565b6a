use jiff::civil::Date;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{
        Outcome,
        store::{AddTaskParameters, Store},
        task::{Priority, Subtask, Task},
    },
    services::{ServiceError, commit},
    storage::Storage,
};

pub fn add_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddTaskParameters,
) -> Result<Outcome<Task>, ServiceError> {
    let outcome = store.add_task(parameters, jiff::Timestamp::now());
    if let Outcome::Applied(task) = &outcome {
        info!(task_number = task.task_number, project = %task.project, "task added");
    }
    commit(store, storage, "add_task", outcome)
}

pub fn toggle_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
) -> Result<Outcome<Task>, ServiceError> {
    let outcome = store.toggle_task(task_id, jiff::Timestamp::now());
    if let Outcome::Applied(task) = &outcome {
        info!(task_number = task.task_number, completed = task.completed, "task toggled");
    }
    commit(store, storage, "toggle_task", outcome)
}

pub fn delete_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
) -> Result<Outcome<Task>, ServiceError> {
    let outcome = store.delete_task(task_id);
    if let Outcome::Applied(task) = &outcome {
        info!(
            task_number = task.task_number,
            subtasks = task.subtasks.len(),
            "task deleted"
        );
    }
    commit(store, storage, "delete_task", outcome)
}

pub fn set_priority(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    priority: Priority,
) -> Result<Outcome<Task>, ServiceError> {
    let outcome = store.set_priority(task_id, priority);
    commit(store, storage, "set_priority", outcome)
}

pub fn set_due_date(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    due_date: Option<Date>,
) -> Result<Outcome<Task>, ServiceError> {
    let outcome = store.set_due_date(task_id, due_date);
    commit(store, storage, "set_due_date", outcome)
}

pub fn add_subtask(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    text: String,
) -> Result<Outcome<Subtask>, ServiceError> {
    let outcome = store.add_subtask(task_id, text);
    commit(store, storage, "add_subtask", outcome)
}

pub fn toggle_subtask(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    subtask_id: Uuid,
) -> Result<Outcome<Subtask>, ServiceError> {
    let outcome = store.toggle_subtask(task_id, subtask_id);
    commit(store, storage, "toggle_subtask", outcome)
}

pub fn delete_subtask(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    subtask_id: Uuid,
) -> Result<Outcome<Subtask>, ServiceError> {
    let outcome = store.delete_subtask(task_id, subtask_id);
    commit(store, storage, "delete_subtask", outcome)
}

pub fn add_project(
    store: &mut Store,
    storage: &impl Storage,
    name: String,
) -> Result<Outcome<String>, ServiceError> {
    let outcome = store.add_project(name);
    if let Outcome::Applied(name) = &outcome {
        info!(project = %name, "project added");
    }
    commit(store, storage, "add_project", outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Ignored,
        storage::memory::MemoryStorage,
        views::{self, ProjectSelection, TaskFilter, ViewMode},
    };

    fn buy_milk() -> AddTaskParameters {
        AddTaskParameters {
            text: String::from("Buy milk"),
            due_date: None,
            project: String::from("Shopping"),
        }
    }

    #[test]
    fn test_applied_changes_are_mirrored() {
        let storage = MemoryStorage::default();
        let mut store = storage.load().unwrap();

        let task = add_task(&mut store, &storage, buy_milk())
            .unwrap()
            .applied()
            .unwrap();

        let mirrored = storage.load().unwrap();
        assert_eq!(mirrored.get_task(task.id), Some(&task));
    }

    #[test]
    fn test_ignored_changes_are_not_written() {
        let storage = MemoryStorage::default();
        let mut store = storage.load().unwrap();

        let outcome = add_task(
            &mut store,
            &storage,
            AddTaskParameters {
                text: String::from("  "),
                ..buy_milk()
            },
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Ignored(Ignored::EmptyText));
        assert!(storage.snapshot().is_none());
    }

    #[test]
    fn test_buy_milk_end_to_end() {
        let storage = MemoryStorage::default();
        let mut store = storage.load().unwrap();

        let task = add_task(&mut store, &storage, buy_milk())
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(views::active_count_for_project(&store.tasks, "Shopping"), 1);

        toggle_task(&mut store, &storage, task.id).unwrap();

        let counts = views::counts(&store);
        assert_eq!(views::active_count_for_project(&store.tasks, "Shopping"), 0);
        assert_eq!(counts.completed, 1);

        let completed = TaskFilter {
            mode: ViewMode::Completed,
            project: ProjectSelection::Project(String::from("Shopping")),
        };
        let mirrored = storage.load().unwrap();
        assert_eq!(views::visible_tasks(&mirrored, &completed).len(), 1);
    }

    #[test]
    fn test_delete_task_with_subtasks() {
        let storage = MemoryStorage::default();
        let mut store = storage.load().unwrap();
        let task = add_task(&mut store, &storage, buy_milk())
            .unwrap()
            .applied()
            .unwrap();
        add_subtask(&mut store, &storage, task.id, String::from("Oat")).unwrap();

        let deleted = delete_task(&mut store, &storage, task.id)
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(deleted.subtasks.len(), 1);
        assert!(storage.load().unwrap().tasks.is_empty());
    }
}
