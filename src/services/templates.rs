// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed workout and meal template pools.

use crate::models::Exercise;

/// Exercise entry in a template.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseTemplate {
    pub name: &'static str,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub duration: Option<&'static str>,
}

impl ExerciseTemplate {
    const fn sets_reps(name: &'static str, sets: u32, reps: u32) -> Self {
        Self {
            name,
            sets: Some(sets),
            reps: Some(reps),
            weight: None,
            duration: None,
        }
    }

    const fn weighted(name: &'static str, sets: u32, reps: u32, weight: f64) -> Self {
        Self {
            name,
            sets: Some(sets),
            reps: Some(reps),
            weight: Some(weight),
            duration: None,
        }
    }

    const fn timed(name: &'static str, sets: Option<u32>, duration: &'static str) -> Self {
        Self {
            name,
            sets,
            reps: None,
            weight: None,
            duration: Some(duration),
        }
    }

    pub fn to_exercise(&self) -> Exercise {
        Exercise {
            name: self.name.to_string(),
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            duration: self.duration.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkoutTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub workout_type: &'static str,
    pub intensity: &'static str,
    pub duration_minutes: u32,
    pub exercises: &'static [ExerciseTemplate],
}

#[derive(Debug, Clone, Copy)]
pub struct MealTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub calories: u32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub ingredients: &'static [&'static str],
}

/// Weekly rotation, one template per training day.
pub const WEEKLY_WORKOUTS: [WorkoutTemplate; 4] = [
    WorkoutTemplate {
        title: "Upper Body Strength",
        description: "Focus on chest, back, shoulders, and arms",
        workout_type: "strength",
        intensity: "moderate",
        duration_minutes: 60,
        exercises: &[
            ExerciseTemplate::sets_reps("Bench Press", 4, 8),
            ExerciseTemplate::sets_reps("Rows", 4, 10),
            ExerciseTemplate::sets_reps("Shoulder Press", 3, 10),
            ExerciseTemplate::sets_reps("Bicep Curls", 3, 12),
        ],
    },
    WorkoutTemplate {
        title: "Lower Body Power",
        description: "Legs and glutes workout",
        workout_type: "strength",
        intensity: "high",
        duration_minutes: 60,
        exercises: &[
            ExerciseTemplate::sets_reps("Squats", 4, 10),
            ExerciseTemplate::sets_reps("Lunges", 3, 12),
            ExerciseTemplate::sets_reps("Leg Press", 4, 10),
            ExerciseTemplate::sets_reps("Calf Raises", 3, 15),
        ],
    },
    WorkoutTemplate {
        title: "Full Body Circuit",
        description: "High-intensity full body workout",
        workout_type: "hiit",
        intensity: "high",
        duration_minutes: 45,
        exercises: &[
            ExerciseTemplate::sets_reps("Burpees", 3, 15),
            ExerciseTemplate::sets_reps("Kettlebell Swings", 4, 20),
            ExerciseTemplate::sets_reps("Push-ups", 3, 15),
            ExerciseTemplate::sets_reps("Mountain Climbers", 3, 20),
        ],
    },
    WorkoutTemplate {
        title: "Core & Cardio",
        description: "Abs and cardiovascular endurance",
        workout_type: "cardio",
        intensity: "moderate",
        duration_minutes: 45,
        exercises: &[
            ExerciseTemplate::timed("Planks", Some(3), "60s"),
            ExerciseTemplate::sets_reps("Russian Twists", 3, 20),
            ExerciseTemplate::timed("Running", None, "20 minutes"),
            ExerciseTemplate::sets_reps("Bicycle Crunches", 3, 20),
        ],
    },
];

pub const WEEKLY_BREAKFASTS: [MealTemplate; 3] = [
    MealTemplate {
        title: "Protein Pancakes",
        description: "High-protein breakfast with berries",
        calories: 420,
        protein_g: 32.0,
        carbs_g: 45.0,
        fat_g: 12.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Egg White Omelette",
        description: "Veggie-packed omelette with whole grain toast",
        calories: 380,
        protein_g: 28.0,
        carbs_g: 35.0,
        fat_g: 14.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Greek Yogurt Bowl",
        description: "Greek yogurt with granola and fruit",
        calories: 400,
        protein_g: 30.0,
        carbs_g: 48.0,
        fat_g: 10.0,
        ingredients: &[],
    },
];

pub const WEEKLY_LUNCHES: [MealTemplate; 3] = [
    MealTemplate {
        title: "Chicken Caesar Salad",
        description: "Grilled chicken with romaine and light dressing",
        calories: 520,
        protein_g: 42.0,
        carbs_g: 35.0,
        fat_g: 22.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Turkey Wrap",
        description: "Whole wheat wrap with turkey and veggies",
        calories: 480,
        protein_g: 38.0,
        carbs_g: 45.0,
        fat_g: 18.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Quinoa Buddha Bowl",
        description: "Quinoa with roasted vegetables and tahini",
        calories: 550,
        protein_g: 35.0,
        carbs_g: 55.0,
        fat_g: 20.0,
        ingredients: &[],
    },
];

pub const WEEKLY_DINNERS: [MealTemplate; 3] = [
    MealTemplate {
        title: "Grilled Salmon",
        description: "Salmon with asparagus and wild rice",
        calories: 620,
        protein_g: 48.0,
        carbs_g: 52.0,
        fat_g: 24.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Lean Beef Stir-Fry",
        description: "Beef with mixed vegetables and brown rice",
        calories: 580,
        protein_g: 45.0,
        carbs_g: 58.0,
        fat_g: 20.0,
        ingredients: &[],
    },
    MealTemplate {
        title: "Chicken Breast Dinner",
        description: "Baked chicken with sweet potato and broccoli",
        calories: 600,
        protein_g: 50.0,
        carbs_g: 55.0,
        fat_g: 18.0,
        ingredients: &[],
    },
];

// Daily pools hold a single entry each.

pub const DAILY_WORKOUTS: [WorkoutTemplate; 1] = [WorkoutTemplate {
    title: "Full Body Strength Training",
    description: "A comprehensive full-body workout focusing on compound movements",
    workout_type: "strength",
    intensity: "moderate",
    duration_minutes: 60,
    exercises: &[
        ExerciseTemplate::weighted("Squats", 4, 10, 135.0),
        ExerciseTemplate::weighted("Bench Press", 4, 8, 155.0),
        ExerciseTemplate::weighted("Deadlifts", 3, 8, 185.0),
        ExerciseTemplate::sets_reps("Pull-ups", 3, 10),
    ],
}];

pub const DAILY_BREAKFASTS: [MealTemplate; 1] = [MealTemplate {
    title: "Protein Power Breakfast",
    description: "High-protein breakfast to start your day",
    calories: 450,
    protein_g: 35.0,
    carbs_g: 40.0,
    fat_g: 15.0,
    ingredients: &[
        "3 eggs",
        "2 slices whole wheat toast",
        "1 avocado",
        "Greek yogurt",
    ],
}];

pub const DAILY_LUNCHES: [MealTemplate; 1] = [MealTemplate {
    title: "Balanced Lunch Bowl",
    description: "Nutrient-dense lunch with lean protein and vegetables",
    calories: 550,
    protein_g: 40.0,
    carbs_g: 50.0,
    fat_g: 20.0,
    ingredients: &[
        "Grilled chicken breast",
        "Quinoa",
        "Mixed vegetables",
        "Olive oil dressing",
    ],
}];

pub const DAILY_DINNERS: [MealTemplate; 1] = [MealTemplate {
    title: "Post-Workout Dinner",
    description: "Recovery meal with optimal protein and carbs",
    calories: 650,
    protein_g: 45.0,
    carbs_g: 60.0,
    fat_g: 22.0,
    ingredients: &["Salmon fillet", "Sweet potato", "Broccoli", "Brown rice"],
}];

/// Template for `offset` days into a rotation.
pub fn pick<T>(pool: &[T], offset: usize) -> &T {
    &pool[offset % pool.len()]
}
