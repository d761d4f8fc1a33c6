//! Static recipe catalog
//!
//! Thirty recipes built from Mercadona (Hacendado) and Lidl products, six per
//! meal type. Ids are stable and follow declaration order starting at 1.

use crate::models::{Macros, MealType, Recipe, RecipeId, Supermarket};

/// Number of catalog recipes per meal type
pub const RECIPES_PER_MEAL_TYPE: usize = 6;

#[allow(clippy::too_many_arguments)]
const fn recipe(
    id: RecipeId,
    name: &'static str,
    meal_type: MealType,
    [calories, protein, carbs, fat]: [u32; 4],
    ingredients: &'static str,
    instructions: &'static str,
    supermarket: Supermarket,
    category: &'static str,
) -> Recipe {
    Recipe {
        id,
        name,
        meal_type,
        macros: Macros {
            calories,
            protein,
            carbs,
            fat,
        },
        ingredients,
        instructions,
        supermarket,
        category,
    }
}

static RECIPES: [Recipe; 30] = [
    recipe(
        1,
        "Tostada con aguacate y huevo",
        MealType::Breakfast,
        [350, 15, 30, 18],
        "Pan de molde integral Hacendado/Lidl (2 rebanadas), Aguacate (1/2 unidad), Huevo L Hacendado (1 unidad), Aceite de oliva virgen extra",
        "Tostar el pan, machacar el aguacate con sal, hacer huevo poché o revuelto",
        Supermarket::Mixed,
        "salado",
    ),
    recipe(
        2,
        "Yogur con avena y frutas",
        MealType::Breakfast,
        [320, 18, 45, 8],
        "Queso fresco batido 0% Hacendado (150g), Copos de avena Lidl (40g), Plátano (1 unidad), Miel (1 cucharada)",
        "Mezclar queso fresco con avena, añadir plátano troceado y miel",
        Supermarket::Mixed,
        "dulce",
    ),
    recipe(
        3,
        "Batido de proteínas casero",
        MealType::Breakfast,
        [280, 25, 30, 6],
        "Proteína whey Powerbar/Lidl (30g), Leche desnatada Hacendado (200ml), Plátano (1/2 unidad)",
        "Batir todo hasta que quede homogéneo",
        Supermarket::Mixed,
        "batido",
    ),
    recipe(
        4,
        "Tortilla francesa con pan tostado",
        MealType::Breakfast,
        [340, 20, 25, 16],
        "Huevos L Hacendado/Lidl (2 unidades), Pan integral de centeno Lidl (1 rebanada), Aceite de oliva (1 cucharadita)",
        "Batir huevos con sal, hacer tortilla francesa con poco aceite",
        Supermarket::Mixed,
        "salado",
    ),
    recipe(
        5,
        "Porridge de avena con manzana",
        MealType::Breakfast,
        [310, 12, 52, 7],
        "Copos de avena finos Lidl (50g), Leche semidesnatada Hacendado (200ml), Canela molida, Manzana Fuji",
        "Cocer avena con leche 5 minutos, añadir canela y manzana troceada",
        Supermarket::Mixed,
        "dulce",
    ),
    recipe(
        6,
        "Requesón con frutos rojos y nueces",
        MealType::Breakfast,
        [290, 22, 28, 9],
        "Requesón light Hacendado (150g), Fresas congeladas Lidl (100g), Nueces peladas (20g), Edulcorante",
        "Mezclar requesón con frutos rojos y nueces troceadas",
        Supermarket::Mixed,
        "dulce",
    ),
    recipe(
        7,
        "Manzana con almendras",
        MealType::MidMorning,
        [180, 5, 25, 8],
        "Manzana Golden (1 unidad), Almendras crudas sin sal Lidl (20g)",
        "Lavar manzana y comer con las almendras",
        Supermarket::Mixed,
        "snack",
    ),
    recipe(
        8,
        "Yogur griego natural",
        MealType::MidMorning,
        [120, 15, 8, 3],
        "Yogur griego natural sin azúcar Hacendado (125g)",
        "Consumir directamente",
        Supermarket::Mercadona,
        "lácteo",
    ),
    recipe(
        9,
        "Zanahoria con hummus",
        MealType::MidMorning,
        [150, 6, 18, 7],
        "Zanahorias frescas (100g), Hummus clásico Hacendado (50g)",
        "Cortar zanahorias en bastones y acompañar con hummus",
        Supermarket::Mixed,
        "salado",
    ),
    recipe(
        10,
        "Barrita proteica",
        MealType::MidMorning,
        [200, 20, 15, 6],
        "Barrita proteica Powerbar/Lidl (45g)",
        "Consumir directamente",
        Supermarket::Mixed,
        "snack",
    ),
    recipe(
        11,
        "Queso fresco con nueces",
        MealType::MidMorning,
        [160, 12, 5, 11],
        "Queso fresco 0% Hacendado (100g), Nueces peladas Lidl (15g)",
        "Acompañar queso con nueces troceadas",
        Supermarket::Mixed,
        "lácteo",
    ),
    recipe(
        12,
        "Pan con tomate",
        MealType::MidMorning,
        [140, 5, 22, 4],
        "Pan de pueblo integral Lidl (1 rebanada), Tomate de ensalada (1/2), Aceite de oliva virgen extra Hacendado, Sal",
        "Tostar pan, rallar tomate, añadir aceite y sal",
        Supermarket::Mixed,
        "salado",
    ),
    recipe(
        13,
        "Pollo al horno con verduras",
        MealType::Lunch,
        [450, 40, 35, 15],
        "Pechuga de pollo fresca Hacendado/Lidl (150g), Patata mediana (150g), Brócoli fresco (100g), Aceite de oliva virgen extra, Sal, Pimienta",
        "Hornear a 200°C durante 25-30 minutos con verduras cortadas",
        Supermarket::Mixed,
        "proteina",
    ),
    recipe(
        14,
        "Salmón con arroz integral",
        MealType::Lunch,
        [480, 35, 45, 18],
        "Filete de salmón fresco Lidl (150g), Arroz integral Hacendado (60g en crudo), Espárragos trigueros (100g), Limón",
        "Cocer arroz 25 min. Hacer salmón a la plancha 4 min por lado. Saltear espárragos.",
        Supermarket::Mixed,
        "pescado",
    ),
    recipe(
        15,
        "Lentejas estofadas con verduras",
        MealType::Lunch,
        [420, 18, 55, 12],
        "Lentejas pardinas Lidl (70g en crudo), Zanahoria (1 unidad), Cebolla (1/2), Pimiento verde (1/2), Laurel",
        "Sofreír verduras, añadir lentejas y cubrir con agua. Cocer 25-30 min.",
        Supermarket::Lidl,
        "legumbre",
    ),
    recipe(
        16,
        "Pasta integral con atún",
        MealType::Lunch,
        [440, 30, 50, 12],
        "Espaguetis integrales Lidl (80g en crudo), Atún al natural Hacendado (2 latas de 52g), Tomate triturado Hacendado (50g), Orégano",
        "Cocer pasta. Mezclar con atún escurrido y tomate. Calentar 2 min.",
        Supermarket::Mixed,
        "pasta",
    ),
    recipe(
        17,
        "Ternera con boniato asado",
        MealType::Lunch,
        [470, 38, 40, 16],
        "Filete de ternera magra Hacendado (150g), Boniato mediano (200g), Judías verdes (100g), Aceite de oliva virgen extra",
        "Hornear boniato 40-45 min a 200°C. Hacer ternera a la plancha. Cocer judías 10 min.",
        Supermarket::Mixed,
        "proteina",
    ),
    recipe(
        18,
        "Ensalada de garbanzos",
        MealType::Lunch,
        [400, 20, 48, 14],
        "Garbanzos cocidos Lidl (200g), Tomates cherry (100g), Pepino (1/2), Atún al natural Hacendado (1 lata), Aceitunas negras, Aceite de oliva",
        "Mezclar todos los ingredientes en un bol y aliñar",
        Supermarket::Mixed,
        "ensalada",
    ),
    recipe(
        19,
        "Yogur con kiwi",
        MealType::AfternoonSnack,
        [150, 10, 22, 3],
        "Yogur natural sin azúcar Hacendado (125g), Kiwi maduro (1 unidad)",
        "Pelar y trocear kiwi, mezclar con yogur",
        Supermarket::Mixed,
        "lácteo",
    ),
    recipe(
        20,
        "Tostada con jamón cocido",
        MealType::AfternoonSnack,
        [180, 15, 18, 5],
        "Pan de molde integral Lidl (1 rebanada), Jamón cocido extra Hacendado (2 lonchas, 60g)",
        "Tostar pan y colocar jamón",
        Supermarket::Mixed,
        "salado",
    ),
    recipe(
        21,
        "Batido verde",
        MealType::AfternoonSnack,
        [140, 3, 32, 1],
        "Plátano (1/2), Fresas Lidl (100g), Agua (200ml)",
        "Batir todo hasta textura suave",
        Supermarket::Mixed,
        "batido",
    ),
    recipe(
        22,
        "Huevos cocidos",
        MealType::AfternoonSnack,
        [140, 12, 1, 10],
        "Huevos L Hacendado/Lidl (2 unidades), Sal",
        "Cocer 10 minutos desde que hierve el agua",
        Supermarket::Mixed,
        "proteina",
    ),
    recipe(
        23,
        "Requesón con canela",
        MealType::AfternoonSnack,
        [120, 14, 8, 4],
        "Requesón light Hacendado (100g), Canela molida Lidl, Edulcorante líquido",
        "Mezclar requesón con canela y edulcorante",
        Supermarket::Mixed,
        "lácteo",
    ),
    recipe(
        24,
        "Surimi con pepino",
        MealType::AfternoonSnack,
        [100, 12, 10, 1],
        "Palitos de cangrejo/surimi Lidl (80g), Pepino (1/2 unidad)",
        "Cortar pepino en bastones y acompañar con surimi",
        Supermarket::Mixed,
        "snack",
    ),
    recipe(
        25,
        "Merluza al horno con verduras",
        MealType::Dinner,
        [320, 30, 20, 12],
        "Filete de merluza Lidl (150g), Calabacín mediano (1 unidad), Cebolla (1/2), Aceite de oliva virgen extra Hacendado",
        "Hornear 20 min a 180°C con verduras en rodajas",
        Supermarket::Mixed,
        "pescado",
    ),
    recipe(
        26,
        "Tortilla de espinacas",
        MealType::Dinner,
        [280, 18, 8, 20],
        "Huevos L Hacendado (2 unidades), Espinacas congeladas Lidl (100g), Queso light Hacendado (1 loncha)",
        "Hacer tortilla con espinacas salteadas y queso",
        Supermarket::Mixed,
        "huevos",
    ),
    recipe(
        27,
        "Ensalada de atún",
        MealType::Dinner,
        [300, 28, 15, 14],
        "Atún al natural Hacendado (2 latas de 52g), Lechuga iceberg (100g), Tomate (1 unidad), Maíz dulce Lidl (30g)",
        "Mezclar todos los ingredientes y aliñar",
        Supermarket::Mixed,
        "ensalada",
    ),
    recipe(
        28,
        "Sepia a la plancha",
        MealType::Dinner,
        [260, 32, 10, 8],
        "Sepia fresca Lidl (200g), Ajo (2 dientes), Perejil fresco, Aceite de oliva virgen extra",
        "Hacer sepia a la plancha con ajo y perejil picado",
        Supermarket::Mixed,
        "pescado",
    ),
    recipe(
        29,
        "Pavo a la plancha con espárragos",
        MealType::Dinner,
        [290, 35, 12, 10],
        "Filete de pechuga de pavo Hacendado (150g), Espárragos trigueros Lidl (150g), Limón",
        "Hacer pavo y espárragos a la plancha, servir con limón",
        Supermarket::Mixed,
        "proteina",
    ),
    recipe(
        30,
        "Crema de calabacín",
        MealType::Dinner,
        [240, 12, 25, 10],
        "Calabacín mediano (2 unidades), Puerro (1 unidad), Queso fresco Hacendado (50g), Aceite de oliva virgen extra",
        "Cocer verduras 15 min, triturar y añadir queso",
        Supermarket::Mixed,
        "crema",
    ),
];

/// Every recipe, ordered by id
pub fn all() -> &'static [Recipe] {
    &RECIPES
}

pub fn get(id: RecipeId) -> Option<&'static Recipe> {
    RECIPES.iter().find(|recipe| recipe.id == id)
}

pub fn by_meal_type(meal_type: MealType) -> impl Iterator<Item = &'static Recipe> {
    RECIPES
        .iter()
        .filter(move |recipe| recipe.meal_type == meal_type)
}
