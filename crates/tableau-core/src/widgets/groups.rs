//! Group maker: split selected students into balanced random groups.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::directory::User;

/// A student that can be placed in a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: u32,
    pub name: String,
}

impl From<&User> for Student {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Shuffle `items` and split them into groups of at most `size`.
///
/// The number of groups is `ceil(n / size)`; sizes differ by at most one and
/// the first `n % groups` groups get the extra member.
pub fn make_groups<T: Clone, R: Rng + ?Sized>(items: &[T], size: usize, rng: &mut R) -> Vec<Vec<T>> {
    if items.is_empty() || size == 0 {
        return Vec::new();
    }
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);

    let total = shuffled.len();
    let count = total.div_ceil(size);
    let base = total / count;
    let extra = total % count;

    let mut groups = Vec::with_capacity(count);
    let mut rest = shuffled.as_slice();
    for i in 0..count {
        let len = if i < extra { base + 1 } else { base };
        let (group, tail) = rest.split_at(len);
        groups.push(group.to_vec());
        rest = tail;
    }
    groups
}

/// State of the group widget.
#[derive(Debug, Clone, Default)]
pub struct GroupMaker {
    students: Vec<Student>,
    selected: Vec<u32>,
    group_size: Option<usize>,
    groups: Vec<Vec<Student>>,
    created: bool,
}

impl GroupMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster. Selections of students that left are dropped.
    pub fn set_students(&mut self, students: Vec<Student>) {
        self.selected.retain(|id| students.iter().any(|s| s.id == *id));
        self.students = students;
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle_student(&mut self, id: u32) {
        if let Some(index) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(index);
        } else if self.students.iter().any(|s| s.id == id) {
            self.selected.push(id);
        }
    }

    pub fn all_selected(&self) -> bool {
        self.selected.len() == self.students.len()
    }

    pub fn some_selected(&self) -> bool {
        !self.selected.is_empty() && !self.all_selected()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Select everyone, or nobody when everyone is already selected.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.students.iter().map(|s| s.id).collect();
        }
    }

    /// Selected students in roster order.
    pub fn selected_students(&self) -> Vec<Student> {
        self.students
            .iter()
            .filter(|s| self.selected.contains(&s.id))
            .cloned()
            .collect()
    }

    pub fn group_size(&self) -> Option<usize> {
        self.group_size
    }

    /// Update the size from the input field.
    ///
    /// A leading positive integer sets the size, an empty field clears it,
    /// anything else leaves it unchanged.
    pub fn set_group_size_input(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.group_size = None;
            return;
        }
        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(size) = digits.parse::<usize>() {
            if size > 0 {
                self.group_size = Some(size);
            }
        }
    }

    pub fn can_create(&self) -> bool {
        self.group_size.is_some() && !self.selected.is_empty()
    }

    /// Build the groups and switch to the group view.
    pub fn create<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(size) = self.group_size else {
            return false;
        };
        if self.selected.is_empty() {
            return false;
        }
        self.groups = make_groups(&self.selected_students(), size, rng);
        self.created = true;
        log::info!("Created {} groups of up to {}", self.groups.len(), size);
        true
    }

    /// Back to the setup view with a fresh draw ready.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.created = false;
        if let Some(size) = self.group_size {
            self.groups = make_groups(&self.selected_students(), size, rng);
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn groups(&self) -> &[Vec<Student>] {
        &self.groups
    }

    /// Move a student from group `from` to the end of group `to`.
    pub fn move_student(&mut self, student_id: u32, from: usize, to: usize) -> bool {
        if from == to || to >= self.groups.len() {
            return false;
        }
        let Some(source) = self.groups.get_mut(from) else {
            return false;
        };
        let Some(index) = source.iter().position(|s| s.id == student_id) else {
            return false;
        };
        let student = source.remove(index);
        self.groups[to].push(student);
        true
    }
}
